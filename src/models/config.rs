use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Configuration options for the publishing service binary.
///
/// Values come from `config/default.yaml` (optional), then `BLOG__*`
/// environment variables, e.g. `BLOG__DATABASE_URL=blog.sqlite3`.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

fn default_pool_size() -> u32 {
    8
}

impl ServerConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("BLOG").separator("__"))
            .build()?
            .try_deserialize()
    }
}
