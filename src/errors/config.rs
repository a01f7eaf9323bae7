//! Configuration errors.

/// Errors raised while loading or validating `EngineConfig`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {variable}: {message}")]
    InvalidValue { variable: String, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}
