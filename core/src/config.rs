//! Application configuration
//!
//! This module re-exports the shared `AppConfig` from spawnwatch-types and
//! provides platform defaults and confy-backed persistence for it.

use thiserror::Error;

pub use spawnwatch_types::AppConfig;

use crate::storage::default_spawn_file;

const APP_NAME: &str = "spawnwatch";
const CONFIG_NAME: &str = "config";

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[source] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),
}

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn load_with_defaults() -> Self;
    fn save(&self) -> Result<(), ConfigError>;
}

impl AppConfigExt for AppConfig {
    /// Load the stored config, falling back to defaults when it is missing or unreadable.
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using default configuration");
            Self::load_with_defaults()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        let mut config: AppConfig =
            confy::load(APP_NAME, CONFIG_NAME).map_err(ConfigError::Load)?;
        if config.data_file.is_empty() {
            config.data_file = default_spawn_file().to_string_lossy().into_owned();
        }
        Ok(config)
    }

    fn load_with_defaults() -> Self {
        AppConfig::with_data_file(default_spawn_file().to_string_lossy().into_owned())
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }
}
