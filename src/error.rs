//! Error types for the CareVoice core

use thiserror::Error;

use crate::engine::RecognitionErrorKind;

/// Result type alias for CareVoice operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the CareVoice core
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Playback error from the synthesis engine
    #[error("playback error: {0}")]
    Playback(String),

    /// Terminal recognition error (cascade exhausted or engine absent)
    #[error("recognition error: {0}")]
    Recognition(RecognitionErrorKind),

    /// Invalid voice session operation for the current state
    #[error("session error: {0}")]
    Session(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
