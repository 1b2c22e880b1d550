use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Events page fetch error: {0}")]
    #[diagnostic(code(mogulsync::fetch))]
    Fetch(String),

    #[error("Markup parse error: {0}")]
    #[diagnostic(code(mogulsync::parse))]
    Parse(String),

    #[error("Calendar resolution error: {0}")]
    #[diagnostic(code(mogulsync::calendar_resolution))]
    CalendarResolution(String),

    #[error("Calendar write error: {0}")]
    #[diagnostic(code(mogulsync::write))]
    Write(String),

    #[error("Calendar API error: {0}")]
    #[diagnostic(code(mogulsync::calendar_api))]
    CalendarApi(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(code(mogulsync::auth))]
    Auth(String),

    #[error("Environment error: {0}")]
    #[diagnostic(code(mogulsync::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(mogulsync::config))]
    Config(String),

    #[error(transparent)]
    #[diagnostic(code(mogulsync::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(mogulsync::serialization))]
    Serialization(String),
}

// Implement From for JSON serialization errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

// Implement From for TOML deserialization errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type SyncResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create fetch errors
pub fn fetch_error(message: &str) -> Error {
    Error::Fetch(message.to_string())
}

/// Helper to create markup parse errors
pub fn parse_error(message: &str) -> Error {
    Error::Parse(message.to_string())
}

/// Helper to create calendar write errors
pub fn write_error(message: &str) -> Error {
    Error::Write(message.to_string())
}

/// Helper to create calendar API errors
pub fn calendar_api_error(message: &str) -> Error {
    Error::CalendarApi(message.to_string())
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}
