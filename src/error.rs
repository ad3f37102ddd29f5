use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Parse error: {0}")]
    #[diagnostic(code(gcal_sync::parse))]
    Parse(String),

    #[error("Validation error: {0}")]
    #[diagnostic(code(gcal_sync::validation))]
    Validation(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(gcal_sync::remote))]
    Remote(String),

    #[error("Credential error: {0}")]
    #[diagnostic(code(gcal_sync::credential))]
    Credential(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(gcal_sync::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(gcal_sync::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(gcal_sync::serialization))]
    Serialization(String),
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for CSV record errors
impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type CalResult<T> = Result<T, Error>;

/// Helper to create parse errors
pub fn parse_error(message: &str) -> Error {
    Error::Parse(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create remote service errors
pub fn remote_error(message: &str) -> Error {
    Error::Remote(message.to_string())
}

/// Helper to create credential errors
pub fn credential_error(message: &str) -> Error {
    Error::Credential(message.to_string())
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}
