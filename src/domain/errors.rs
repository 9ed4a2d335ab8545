// src/domain/errors.rs
use std::error::Error as StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A use-case failure surfaced at the top level
    #[error("Order error: {0}")]
    Application(Box<dyn StdError + Send + Sync>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures talking to the ordering backend.
///
/// Every variant is recoverable by retrying the action that issued the
/// request; none of them is allowed to touch client-side state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Non-2xx response. `errors` holds the messages of a structured
    /// error list when the body carried one, in backend order.
    #[error("Request failed with status code {status}")]
    Status { status: u16, errors: Vec<String> },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request failed without any usable detail.
    #[error("Request failed")]
    Unknown,
}

impl BackendError {
    /// First message of the backend's structured error list, if any
    pub fn field_message(&self) -> Option<&str> {
        match self {
            BackendError::Status { errors, .. } => errors
                .iter()
                .map(|m| m.trim())
                .find(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Transport-level description, absent when nothing is known
    pub fn transport_message(&self) -> Option<String> {
        match self {
            BackendError::Unknown => None,
            other => Some(other.to_string()),
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type BackendResult<T> = Result<T, BackendError>;
