use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

use serde_json::Value as JsonValue;
use terracache_core::Context;
use terracache_serve::{
    start_server, Controller, DiscoveryController, EndpointProvider, HealthController,
    StaticEndpoints,
};

use super::config::{CacheConfig, ServeSettings};
use super::env::CacheEnv;
use super::StartServer;

pub async fn handle_serve_command(
    cmd: &StartServer,
    ctx: &Context,
    env: &CacheEnv,
) -> Result<(), String> {
    let config = CacheConfig::load(cmd.config_path.as_deref(), env)?;
    let settings = ServeSettings::resolve(
        cmd.network_binding_ip_address.as_deref(),
        cmd.network_binding_port,
        &config,
        env,
    )?;

    let overrides = cmd
        .endpoints
        .iter()
        .map(|arg| parse_endpoint_arg(arg))
        .collect::<Result<StaticEndpoints, String>>()?;

    let controllers = build_controllers(StaticEndpoints::new(config.discovery.endpoints), overrides);

    let network_binding = settings.network_binding();
    let handle = start_server(&network_binding, controllers, ctx)
        .await
        .map_err(|e| e.to_string())?;

    println!(
        "{} Serving service discovery on http://{}/.well-known/terraform.json",
        green!("✓"),
        network_binding
    );

    let (kill_tx, kill_rx) = channel();
    ctrlc::set_handler(move || {
        if let Err(_e) = kill_tx.send(true) {
            std::process::exit(1);
        }
    })
    .map_err(|e| format!("unable to set Ctrl-C handler: {}", e))?;

    wait_for_kill_signal(kill_rx, ctx).await;
    ctx.try_log(|logger| info!(logger, "Stopping server {}", network_binding));
    handle.stop(true).await;
    Ok(())
}

/// Blocks until Ctrl-C is pressed. Returns `false` when the signal could not be
/// received, after logging why.
pub async fn wait_for_kill_signal(kill_rx: Receiver<bool>, ctx: &Context) -> bool {
    match tokio::task::spawn_blocking(move || kill_rx.recv()).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            ctx.try_log(|logger| error!(logger, "Ctrl-C handler disconnected: {}", e));
            false
        }
        Err(e) => {
            ctx.try_log(|logger| error!(logger, "Ctrl-C listener failed: {}", e));
            false
        }
    }
}

/// Endpoints from the command line are registered after the configured ones,
/// so they take precedence for a shared service name.
pub fn build_controllers(
    configured: StaticEndpoints,
    overrides: StaticEndpoints,
) -> Vec<Arc<dyn Controller>> {
    let mut providers: Vec<Arc<dyn EndpointProvider>> = vec![];
    for endpoints in [configured, overrides] {
        if !endpoints.is_empty() {
            providers.push(Arc::new(endpoints));
        }
    }
    vec![Arc::new(HealthController), Arc::new(DiscoveryController::new(providers))]
}

/// Parses `SERVICE=DESCRIPTOR`. The descriptor is read as JSON when it parses,
/// otherwise it is kept as a plain string.
pub fn parse_endpoint_arg(arg: &str) -> Result<(String, JsonValue), String> {
    let Some((service, descriptor)) = arg.split_once('=') else {
        return Err(format!("invalid endpoint '{}': expected SERVICE=DESCRIPTOR", arg));
    };
    let service = service.trim();
    if service.is_empty() {
        return Err(format!("invalid endpoint '{}': missing service name", arg));
    }
    let descriptor = serde_json::from_str::<JsonValue>(descriptor)
        .unwrap_or_else(|_| JsonValue::String(descriptor.to_string()));
    Ok((service.to_string(), descriptor))
}
