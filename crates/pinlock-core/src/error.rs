//! Error types for the PIN gate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GateError>;

/// Errors raised while setting the gate up or touching session storage.
///
/// Nothing a user types can produce one of these: wrong codes, overflowing
/// appends and deletes on an empty buffer are all handled inside the state
/// machine.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Secret must be exactly {expected} digits (got {found} characters)")]
    InvalidSecretLength { expected: usize, found: usize },

    #[error("Secret must contain only digits")]
    InvalidSecretFormat,

    #[error("Secret unavailable: {0}")]
    SecretUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
