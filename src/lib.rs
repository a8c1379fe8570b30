//! streamscribe - near-real-time chunked audio transcription pipeline
//!
//! Segments a live audio stream into fixed-duration chunks, submits each
//! chunk to an external transcription engine together with the transcript
//! accumulated so far, and reassembles the results into one continuously
//! growing transcript.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod storage;
pub mod streaming;

pub use config::{AudioConfig, ChunkingConfig, PipelineConfig, StorageConfig};
pub use engine::{MockEngine, TranscriptionEngine, http::HttpEngine};
pub use error::{Result, ScribeError};
pub use storage::{LocalStore, MemoryStore, ObjectStore};
pub use streaming::{
    AudioChunk, AudioFrame, CaptureHandle, RecordingSession, RecordingState, TranscriptSegment,
};
