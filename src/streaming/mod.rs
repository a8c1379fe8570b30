//! Streaming pipeline for near-real-time chunked transcription.
//!
//! ```text
//! ┌─────────┐    ┌─────────────┐    ┌───────────┐    ┌─────────────┐    ┌────────────┐
//! │ Capture │───▶│ FrameBuffer │───▶│ Extractor │───▶│  Dispatch   │───▶│Coordinator │
//! │callback │    │  (append)   │    │ (100ms    │    │  (unbounded │    │ (sequential│
//! └─────────┘    └─────────────┘    │  ticks)   │    │   queue)    │    │  engine    │
//!                                   └───────────┘    └─────────────┘    │  calls)    │
//!                                                                       └─────┬──────┘
//!                                                                             ▼
//!                                                                    transcript (locked)
//! ```
//!
//! The capture side never blocks on I/O; the extractor and coordinator run
//! as background tasks owned by a [`session::RecordingSession`].

pub mod coordinator;
pub mod dispatch;
pub mod extractor;
pub mod frame;
pub mod frame_buffer;
pub mod session;
pub mod transcript;

pub use coordinator::TranscriptionCoordinator;
pub use dispatch::{ChunkReceiver, ChunkSender, chunk_channel};
pub use extractor::ChunkExtractor;
pub use frame::{AudioChunk, AudioFrame, TranscriptSegment};
pub use frame_buffer::FrameBuffer;
pub use session::{CaptureHandle, RecordingSession, RecordingState};
pub use transcript::SharedTranscript;
