//! Server settings
//!
//! Defaults overridable by an optional `housing-api.toml` file and
//! `HOUSING_`-prefixed environment variables (`HOUSING_PORT=9000`).

use std::path::PathBuf;

use serde::Deserialize;

/// REST server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    /// Directory holding the frozen artifact bundle
    pub model_dir: PathBuf,
}

impl ApiSettings {
    /// Load settings from defaults, optional file, then environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("model_dir", "models")?
            .add_source(config::File::with_name("housing-api").required(false))
            .add_source(config::Environment::with_prefix("HOUSING"))
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
