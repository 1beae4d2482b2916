use thiserror::Error as ThisError;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/// Error type used throughout the crate. Every variant is terminal for the current invocation;
/// nothing in the crate retries.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The IP range document could not be retrieved.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The retrieved document does not match the expected MD5 digest.
    #[error("MD5 Mismatch: got {actual} expected {expected}")]
    Integrity { expected: String, actual: String },

    /// The retrieved document (or an event payload) is not valid.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The named IP set does not exist in the requested scope.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The IP set changed since its lock token was read.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A required configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Any other failure reported by the downstream IP set API.
    #[error("Service error: {0}")]
    Service(String),

    /// An asynchronous invocation or lifecycle response could not be delivered.
    #[error("Invocation error: {0}")]
    Invocation(String),
}

// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    pub fn invocation(msg: impl Into<String>) -> Self {
        Self::Invocation(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

/*--------------------------------------------------------------------------------------
  Log Error Function
--------------------------------------------------------------------------------------*/

pub(crate) fn log_error(error: &Error) {
    log::error!("{}", error);
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
