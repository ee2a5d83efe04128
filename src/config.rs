//! Toaster configuration management and settings

use crate::error::{ToasterError, ToasterResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Maximum number of toasts kept in state at once
pub const DEFAULT_TOAST_LIMIT: usize = 1;

/// Delay before a dismissed toast is purged from state
pub const DEFAULT_REMOVE_DELAY_MS: u64 = 1_000_000;

/// Configuration for the toast dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToasterConfig {
    /// Capacity of the toast sequence; older toasts are evicted past this
    pub limit: usize,

    /// Safety-net delay between dismissal and removal from state
    pub remove_delay_ms: u64,

    /// Display duration requested from the external rendering surface
    pub surface_duration_ms: u64,
}

impl Default for ToasterConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TOAST_LIMIT,
            remove_delay_ms: DEFAULT_REMOVE_DELAY_MS,
            surface_duration_ms: DEFAULT_REMOVE_DELAY_MS,
        }
    }
}

impl ToasterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity of the toast sequence
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the removal delay applied after dismissal
    pub fn with_remove_delay(mut self, delay: Duration) -> Self {
        self.remove_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the duration handed to the rendering surface
    pub fn with_surface_duration(mut self, duration: Duration) -> Self {
        self.surface_duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn remove_delay(&self) -> Duration {
        Duration::from_millis(self.remove_delay_ms)
    }

    pub fn surface_duration(&self) -> Duration {
        Duration::from_millis(self.surface_duration_ms)
    }

    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("toaster").join("config.toml"))
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> ToasterResult<Self> {
        let config: ToasterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file, falling back to defaults when it does not exist
    pub async fn load_from_file(path: &Path) -> ToasterResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> ToasterResult<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> ToasterResult<()> {
        if self.limit == 0 {
            return Err(ToasterError::config_error("Toast limit must be greater than 0"));
        }

        if self.remove_delay_ms == 0 {
            return Err(ToasterError::config_error(
                "Remove delay must be greater than 0",
            ));
        }

        if self.surface_duration_ms == 0 {
            return Err(ToasterError::config_error(
                "Surface duration must be greater than 0",
            ));
        }

        Ok(())
    }
}
