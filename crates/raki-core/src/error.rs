//! Error types for the assistant core.

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Decryption failure: wrong key, tampered token, or a token too short to hold a nonce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptError {
    #[error("token too short ({0} bytes)")]
    Truncated(usize),
    #[error("authentication failed (foreign key or tampered token)")]
    Authentication,
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("decrypt error: {0}")]
    Decrypt(#[from] DecryptError),

    #[error("encrypt error: {0}")]
    Encrypt(String),

    #[error("key file {path}: {reason}")]
    KeyFile { path: String, reason: String },

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("command pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
