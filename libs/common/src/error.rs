//! Custom error types for the common library
//!
//! This module defines the client error taxonomy shared by every crate of the
//! workspace. Each variant maps to exactly one user-facing notification text.

use thiserror::Error;

/// Notification text for requests that never reached the server
pub const TRANSPORT_MESSAGE: &str =
    "Unable to connect to the server. Please check your internet connection.";

/// Notification text for 401/403 responses
pub const AUTH_MESSAGE: &str = "Authentication error. Please log in again.";

/// Notification text for successful responses carrying an unreadable body
pub const DECODE_MESSAGE: &str = "Unexpected response from the server.";

/// Custom error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// No response reached the client (connection refused, DNS, timeout)
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server rejected the credentials (401 or 403)
    #[error("Authentication error ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Any other non-success response
    #[error("{message}")]
    Protocol { status: u16, message: String },

    /// A success response whose body could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// Client-side form checks, raised before any request is sent
    #[error("{0}")]
    Validation(String),

    /// Persisted client state could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// The text shown to the user when this error surfaces
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => TRANSPORT_MESSAGE.to_string(),
            ClientError::Auth { .. } => AUTH_MESSAGE.to_string(),
            ClientError::Protocol { message, .. } => message.clone(),
            ClientError::Decode(_) => DECODE_MESSAGE.to_string(),
            ClientError::Validation(message) => message.clone(),
            ClientError::Storage(message) => format!("Could not save your session: {}", message),
            ClientError::Configuration(message) => message.clone(),
        }
    }

    /// Whether the server rejected the caller's credentials
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth { .. })
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(err: config::ConfigError) -> Self {
        ClientError::Configuration(err.to_string())
    }
}

/// Type alias for Result with ClientError
pub type ClientResult<T> = Result<T, ClientError>;
