//! Error types for the Raki voice layer

use thiserror::Error;

/// Result type alias for voice operations
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Errors that can occur while speaking or listening
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Voice provider unavailable: {0}")]
    Unavailable(String),

    #[error("Unknown voice provider: {0}")]
    UnknownProvider(String),

    #[error("TTS error: {0}")]
    Tts(String),

    #[error("Input stream closed")]
    InputClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
