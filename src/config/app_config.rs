use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::workflow_config::{DEFAULT_MAX_DEPTH, ValidationOptions};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub validation: ValidationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Validation engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub max_depth: usize,
    pub enforce_model_catalog: bool,

    /// TOML catalog replacing the built-in model table
    pub catalog_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            enforce_model_catalog: true,
            catalog_path: None,
        }
    }
}

impl From<&ValidationSettings> for ValidationOptions {
    fn from(settings: &ValidationSettings) -> Self {
        ValidationOptions::default()
            .with_max_depth(settings.max_depth)
            .with_enforce_model_catalog(settings.enforce_model_catalog)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
