//! Error types for the toaster crate
//!
//! The dispatcher core is total and never fails; errors only arise while
//! loading, validating or saving configuration.

use thiserror::Error;

/// Result type for toaster operations
pub type ToasterResult<T> = Result<T, ToasterError>;

/// Error types surfaced by configuration handling
#[derive(Error, Debug)]
pub enum ToasterError {
    #[error("Toaster configuration error: {message}")]
    Config { message: String },

    #[error("Failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ToasterError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        ToasterError::Config {
            message: message.into(),
        }
    }

    /// Check if this error came from invalid configuration values
    pub fn is_config_error(&self) -> bool {
        matches!(self, ToasterError::Config { .. } | ToasterError::Parse(_))
    }
}
