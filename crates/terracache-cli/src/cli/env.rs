use dotenvy::dotenv;

pub const TERRACACHE_HOST_KEY: &str = "TERRACACHE_HOST";
pub const TERRACACHE_PORT_KEY: &str = "TERRACACHE_PORT";
pub const TERRACACHE_CONFIG_KEY: &str = "TERRACACHE_CONFIG";
pub const TF_DATA_DIR_KEY: &str = "TF_DATA_DIR";

/// Reads `key` after loading `.env`; empty values count as unset.
pub fn get_env_var(key: &str) -> Option<String> {
    dotenv().ok();
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheEnv {
    pub host: Option<String>,
    pub port: Option<String>,
    pub config_path: Option<String>,
    pub tf_data_dir: Option<String>,
}

impl CacheEnv {
    pub fn load() -> Self {
        Self {
            host: get_env_var(TERRACACHE_HOST_KEY),
            port: get_env_var(TERRACACHE_PORT_KEY),
            config_path: get_env_var(TERRACACHE_CONFIG_KEY),
            tf_data_dir: get_env_var(TF_DATA_DIR_KEY),
        }
    }
}
