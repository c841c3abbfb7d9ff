use std::path::{Path, PathBuf};

use terracache_core::{
    parse_terraform_state_file, parse_terraform_state_file_from_location, Context, JsonMap,
    StateError, TerraformState,
};

use super::env::CacheEnv;
use super::{CheckRemoteState, LocateState, ShowOutputs, ShowState};

pub fn handle_show_command(cmd: &ShowState, _ctx: &Context) -> Result<(), String> {
    let path = Path::new(&cmd.state_file_path);
    let state = load_state(path)?;
    if cmd.output_json {
        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| format!("unable to serialize state: {}", e))?;
        println!("{}", json);
    } else {
        println!("{}", render_state_summary(&cmd.state_file_path, &state));
    }
    Ok(())
}

pub fn handle_is_remote_command(cmd: &CheckRemoteState, _ctx: &Context) -> Result<(), String> {
    let state = load_state(Path::new(&cmd.state_file_path))?;
    println!("{}", state.is_remote());
    Ok(())
}

pub fn handle_locate_command(
    cmd: &LocateState,
    ctx: &Context,
    env: &CacheEnv,
) -> Result<(), String> {
    match locate_state(cmd, env)? {
        Some((path, state)) => {
            ctx.try_log(|logger| info!(logger, "Using state file {}", path.display()));
            println!("{}", render_state_summary(&path.display().to_string(), &state));
        }
        None => {
            println!("{} No state file found in '{}'", yellow!("!"), cmd.working_dir);
        }
    }
    Ok(())
}

/// `--data-dir`, then `TF_DATA_DIR`. `None` keeps the `.terraform` default.
pub fn resolve_data_dir<'a>(cli_data_dir: Option<&'a str>, env: &'a CacheEnv) -> Option<&'a str> {
    cli_data_dir.or(env.tf_data_dir.as_deref())
}

pub fn locate_state(
    cmd: &LocateState,
    env: &CacheEnv,
) -> Result<Option<(PathBuf, TerraformState)>, String> {
    let working_dir = Path::new(&cmd.working_dir);
    let data_dir = resolve_data_dir(cmd.data_dir.as_deref(), env).map(Path::new);
    parse_terraform_state_file_from_location(working_dir, data_dir).map_err(describe)
}

pub fn handle_outputs_command(cmd: &ShowOutputs, _ctx: &Context) -> Result<(), String> {
    let state = load_state(Path::new(&cmd.state_file_path))?;
    let outputs = module_outputs(&state, &cmd.module)?;
    let json = serde_json::to_string_pretty(outputs)
        .map_err(|e| format!("unable to serialize outputs: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn load_state(path: &Path) -> Result<TerraformState, String> {
    parse_terraform_state_file(path).map_err(describe)
}

fn describe(err: StateError) -> String {
    if err.is_syntax() {
        format!("{} (the file is not valid JSON)", err)
    } else {
        err.to_string()
    }
}

/// Outputs of the module addressed by a dotted path such as `root.network`.
pub fn module_outputs<'a>(state: &'a TerraformState, module: &str) -> Result<&'a JsonMap, String> {
    let path = module.split('.').collect::<Vec<_>>();
    match state.module(&path) {
        Some(module) => Ok(&module.outputs),
        None => {
            let available =
                state.modules.iter().map(|m| m.display_path()).collect::<Vec<_>>().join(", ");
            Err(format!("module '{}' not found (available: {})", module, available))
        }
    }
}

pub fn render_state_summary(location: &str, state: &TerraformState) -> String {
    let mut lines = vec![
        format!("State file '{}'", location),
        format!("  version: {}", state.version),
        format!("  serial:  {}", state.serial),
    ];
    match &state.backend {
        Some(backend) => {
            let keys = backend.config.keys().map(String::as_str).collect::<Vec<_>>();
            lines.push(format!("  backend: {} ({})", backend.backend_type, keys.join(", ")));
        }
        None => lines.push("  backend: none (local state)".to_string()),
    }
    lines.push(format!("  modules: {}", state.modules.len()));
    for module in state.modules.iter() {
        lines.push(format!(
            "    {} ({} outputs, {} resources)",
            module.display_path(),
            module.outputs.len(),
            module.resources.len()
        ));
    }
    lines.join("\n")
}
