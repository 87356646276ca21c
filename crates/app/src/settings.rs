//! Application settings, read from `settings.toml` next to the binary.
//! Environment variables prefixed with `FAREBOX_` override file values,
//! e.g. `FAREBOX_SERVER__API_KEY`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("FAREBOX").separator("__"))
            .set_default("app.level", "info")?
            .set_default("server.port", 3000)?
            .build()?;

        settings.try_deserialize()
    }
}
