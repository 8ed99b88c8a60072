//! Error types for portal-it.

use thiserror::Error;

use crate::shape::ShapeViolation;

/// Result type alias using portal-it's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for portal-it operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The backend could not be reached or does not know the command
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer within the transport's deadline
    #[error("Command timed out: {command}")]
    Timeout { command: String },

    /// The backend answered with an error for this command
    #[error("Command {command} rejected: {message}")]
    Rejected { command: String, message: String },

    /// The backend answered, but the response broke the command's contract
    #[error("Malformed response: {0}")]
    Shape(#[from] ShapeViolation),

    /// The operation does not exist for the requested collection
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a rejection for `command` from any displayable backend message.
    pub fn rejected(command: &str, message: impl Into<String>) -> Self {
        Error::Rejected {
            command: command.to_string(),
            message: message.into(),
        }
    }

    /// Whether the failure means the backend is absent rather than broken.
    ///
    /// Offline operation produces these routinely; everything else points at
    /// a backend that is present but misbehaving.
    pub fn is_backend_absent(&self) -> bool {
        matches!(self, Error::Unavailable(_) | Error::Timeout { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
