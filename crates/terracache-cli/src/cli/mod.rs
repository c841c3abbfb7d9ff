use clap::{Parser, Subcommand};
use std::process;
use terracache_core::Context;

mod config;
mod env;
mod serve;
mod state;

use env::CacheEnv;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum Command {
    /// Inspect legacy state files
    #[clap(subcommand, name = "state", bin_name = "state")]
    State(StateCommand),
    /// Start the service discovery server
    #[clap(name = "serve", bin_name = "serve")]
    Serve(StartServer),
}

#[derive(Subcommand, PartialEq, Clone, Debug)]
enum StateCommand {
    /// Summarize a state file
    #[clap(name = "show", bin_name = "show")]
    Show(ShowState),
    /// Print whether a state file is cached from a remote backend
    #[clap(name = "is-remote", bin_name = "is-remote")]
    IsRemote(CheckRemoteState),
    /// Find and summarize the state file of a working directory
    #[clap(name = "locate", bin_name = "locate")]
    Locate(LocateState),
    /// Print the outputs of a module
    #[clap(name = "outputs", bin_name = "outputs")]
    Outputs(ShowOutputs),
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct ShowState {
    /// Path to the state file
    pub state_file_path: String,
    /// Print the decoded state as JSON
    #[arg(long = "json")]
    pub output_json: bool,
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct CheckRemoteState {
    /// Path to the state file
    pub state_file_path: String,
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct LocateState {
    /// Working directory to search
    #[arg(long = "working-dir", short = 'w', default_value = ".")]
    pub working_dir: String,
    /// Data directory holding the cached remote state (defaults to TF_DATA_DIR, then .terraform)
    #[arg(long = "data-dir", short = 'd')]
    pub data_dir: Option<String>,
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct ShowOutputs {
    /// Path to the state file
    pub state_file_path: String,
    /// Dotted module path
    #[arg(long = "module", short = 'm', default_value = "root")]
    pub module: String,
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct StartServer {
    /// Path to the configuration file (defaults to TERRACACHE_CONFIG, then ./terracache.toml)
    #[arg(long = "config", short = 'c')]
    pub config_path: Option<String>,
    /// Set the host address the server binds to
    #[arg(long = "ip", short = 'i')]
    pub network_binding_ip_address: Option<String>,
    /// Set the port the server binds to
    #[arg(long = "port", short = 'p')]
    pub network_binding_port: Option<u16>,
    /// Advertise a service, as SERVICE=DESCRIPTOR (can be repeated)
    #[arg(long = "endpoint", short = 'e')]
    pub endpoints: Vec<String>,
}

pub fn main() {
    let logger = hiro_system_kit::log::setup_logger();
    let _guard = hiro_system_kit::log::setup_global_logger(logger.clone());
    let ctx = Context::new(logger);

    let opts: Opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(e) => {
            println!("{}", e);
            process::exit(1);
        }
    };

    let env = CacheEnv::load();

    match hiro_system_kit::nestable_block_on(handle_command(opts, &ctx, &env)) {
        Err(e) => {
            error!(ctx.expect_logger(), "{e}");
            std::thread::sleep(std::time::Duration::from_millis(500));
            process::exit(1);
        }
        Ok(_) => {}
    }
}

async fn handle_command(opts: Opts, ctx: &Context, env: &CacheEnv) -> Result<(), String> {
    match opts.command {
        Command::State(StateCommand::Show(cmd)) => {
            state::handle_show_command(&cmd, ctx)?;
        }
        Command::State(StateCommand::IsRemote(cmd)) => {
            state::handle_is_remote_command(&cmd, ctx)?;
        }
        Command::State(StateCommand::Locate(cmd)) => {
            state::handle_locate_command(&cmd, ctx, env)?;
        }
        Command::State(StateCommand::Outputs(cmd)) => {
            state::handle_outputs_command(&cmd, ctx)?;
        }
        Command::Serve(cmd) => {
            serve::handle_serve_command(&cmd, ctx, env).await?;
        }
    }
    Ok(())
}
