use config::{Config, Environment, File};
use serde::Deserialize;

use crate::logger::Level;
use crate::AppError;

fn default_name() -> String {
    "type_local".to_string()
}

fn default_log_level() -> Level {
    Level::Info
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub initial_capacity: usize,
    #[serde(default = "default_log_level")]
    pub log_level: Level,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { name: default_name(), initial_capacity: 0, log_level: default_log_level() }
    }
}

impl CacheSettings {
    /// Loads settings from `path` (any format the `config` crate recognises, extension optional)
    /// with `TYPELOCAL__*` environment variables taking precedence. A missing file is not an error.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let builder =
            Config::builder()
                .add_source(File::with_name(path).required(false))
                .add_source(Environment::with_prefix("TYPELOCAL").try_parsing(true).separator("__"));
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}
