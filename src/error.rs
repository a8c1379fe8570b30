//! Error types for streamscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScribeError {
    // Buffer errors
    #[error("Insufficient buffered audio: requested {requested_ms}ms, have {buffered_ms}ms")]
    InsufficientData { requested_ms: u32, buffered_ms: u32 },

    // Session state errors
    #[error("Recording is already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    // Pipeline errors
    #[error("Transcription engine error: {message}")]
    Engine { message: String },

    #[error("Object storage error: {message}")]
    Storage { message: String },

    #[error("Audio encoding failed: {message}")]
    Encoding { message: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScribeError {
    /// True for errors that signal an expected no-op rather than a failure.
    ///
    /// `InsufficientData` is the extractor's "not enough audio yet" signal;
    /// a tick that sees it simply waits for the next one.
    pub fn is_soft(&self) -> bool {
        matches!(self, ScribeError::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScribeError>;
