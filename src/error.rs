//! Error types for chatboat.
//!
//! Validation failures inside the wizard are never errors: they surface as
//! toasts and leave state untouched. The types here cover configuration and
//! the outbound chat call.

pub use crate::provider::ProviderError;

/// Top-level error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum ChatboatError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Chat provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = ChatboatError> = std::result::Result<T, E>;
