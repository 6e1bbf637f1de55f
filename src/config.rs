//! Configuration module for lora-browse
//!
//! Settings live in `<config_dir>/lora-browse/config.toml` and may be
//! overridden with `LORA_BROWSE_*` environment variables
//! (e.g. `LORA_BROWSE_SERVER_URL`).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Log filter used until a configuration has been loaded
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BrowseConfig {
    /// Base URL of the LoRA manager server
    pub server_url: String,

    /// Location of the durable filter store; platform data dir when unset
    pub storage_path: Option<PathBuf>,

    /// How many top tags to offer in the filter panel
    pub tag_limit: usize,

    /// Items fetched per listing page
    pub page_size: u32,

    /// Delay before the bulk-action panel is revealed
    pub panel_reveal_delay_ms: u64,

    /// Announce the active filter summary after each explicit apply
    pub notify_on_apply: bool,

    /// Open the listing page in the browser when an in-place reload fails
    pub navigation_fallback: bool,

    /// Suppress informational output by default
    pub quiet: bool,

    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8188".to_string(),
            storage_path: None,
            tag_limit: 20,
            page_size: 20,
            panel_reveal_delay_ms: 100,
            notify_on_apply: true,
            navigation_fallback: true,
            quiet: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl BrowseConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("lora-browse").join("config.toml"))
    }

    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from `path` with environment overrides applied
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or an override cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("LORA_BROWSE").try_parsing(true))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Render the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }

    /// Log filter for a load attempt, usable before its error is reported
    #[must_use]
    pub fn log_level_of(loaded: &Result<Self, ConfigError>) -> &str {
        loaded
            .as_ref()
            .map_or(DEFAULT_LOG_LEVEL, |config| config.log_level.as_str())
    }

    #[must_use]
    pub const fn panel_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.panel_reveal_delay_ms)
    }
}
