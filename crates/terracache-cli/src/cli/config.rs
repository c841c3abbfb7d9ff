use std::path::PathBuf;

use serde::Deserialize;
use terracache_core::JsonMap;
use terracache_serve::{DEFAULT_BINDING_ADDRESS, DEFAULT_BINDING_PORT};

use super::env::{CacheEnv, TERRACACHE_PORT_KEY};

pub const DEFAULT_CONFIG_FILE: &str = "terracache.toml";

/// Contents of `terracache.toml`.
///
/// ```toml
/// [server]
/// host = "0.0.0.0"
/// port = 5758
///
/// [discovery.endpoints]
/// "modules.v1" = "/v1/modules/"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub server: ServerSection,
    pub discovery: DiscoverySection,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    pub endpoints: JsonMap,
}

impl CacheConfig {
    pub fn from_toml_str(content: &str) -> Result<CacheConfig, String> {
        toml::from_str(content).map_err(|e| format!("config file malformatted: {}", e))
    }

    /// An explicitly named file (flag or environment) must exist; the default
    /// `terracache.toml` is optional.
    pub fn load(explicit_path: Option<&str>, env: &CacheEnv) -> Result<CacheConfig, String> {
        let (path, required) = match explicit_path.or(env.config_path.as_deref()) {
            Some(path) => (PathBuf::from(path), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !path.is_file() {
            if required {
                return Err(format!("config file '{}' not found", path.display()));
            }
            return Ok(CacheConfig::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| format!("unable to read config file '{}': {}", path.display(), e))?;
        CacheConfig::from_toml_str(&content).map_err(|e| format!("{} ({})", e, path.display()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServeSettings {
    pub host: String,
    pub port: u16,
}

impl ServeSettings {
    /// Flag, then config file, then environment, then built-in default.
    pub fn resolve(
        cli_host: Option<&str>,
        cli_port: Option<u16>,
        config: &CacheConfig,
        env: &CacheEnv,
    ) -> Result<ServeSettings, String> {
        let host = cli_host
            .map(str::to_string)
            .or_else(|| config.server.host.clone())
            .or_else(|| env.host.clone())
            .unwrap_or_else(|| DEFAULT_BINDING_ADDRESS.to_string());

        let port = match cli_port.or(config.server.port) {
            Some(port) => port,
            None => match env.port.as_deref() {
                Some(raw) => raw.parse::<u16>().map_err(|_| {
                    format!("{} must be a port number, got '{}'", TERRACACHE_PORT_KEY, raw)
                })?,
                None => DEFAULT_BINDING_PORT
                    .parse::<u16>()
                    .map_err(|e| format!("invalid default port: {}", e))?,
            },
        };

        Ok(ServeSettings { host, port })
    }

    pub fn network_binding(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
