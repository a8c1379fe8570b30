//! Recording session lifecycle.
//!
//! Owns the frame buffer, the dispatch queue, and the extractor/coordinator
//! tasks; exposes the transcript and recording flag to the consuming layer.
//! State machine: Idle → Recording → Stopping → Idle. Starting resets the
//! transcript, sequence numbering, and buffer; stopping signals the
//! extractor, then drains every already-dispatched chunk (including an
//! in-flight engine call) before returning.

use crate::config::PipelineConfig;
use crate::engine::TranscriptionEngine;
use crate::error::{Result, ScribeError};
use crate::storage::ObjectStore;
use crate::streaming::coordinator::TranscriptionCoordinator;
use crate::streaming::dispatch::chunk_channel;
use crate::streaming::extractor::ChunkExtractor;
use crate::streaming::frame::{AudioFrame, TranscriptSegment};
use crate::streaming::frame_buffer::FrameBuffer;
use crate::streaming::transcript::SharedTranscript;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Recording state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    /// Stop has been signaled; the dispatched backlog is draining.
    Stopping,
}

/// A recording session managing the capture-to-transcript pipeline.
pub struct RecordingSession {
    config: PipelineConfig,
    engine: Arc<dyn TranscriptionEngine>,
    store: Option<Arc<dyn ObjectStore>>,

    state: Mutex<RecordingState>,
    /// Gate for the capture path and the extractor loop.
    running: Arc<AtomicBool>,
    buffer: Arc<Mutex<FrameBuffer>>,
    transcript: SharedTranscript,

    extractor_task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
    coordinator_task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl RecordingSession {
    /// Creates an idle session.
    ///
    /// The object store is only consulted when chunk persistence is enabled
    /// in the configuration.
    pub fn new(
        config: PipelineConfig,
        engine: Arc<dyn TranscriptionEngine>,
        store: Option<Arc<dyn ObjectStore>>,
    ) -> Self {
        let store = if config.storage.persist_chunks {
            store
        } else {
            None
        };
        let buffer = Arc::new(Mutex::new(FrameBuffer::new(
            config.audio.capture_sample_rate,
            config.audio.capture_channels,
        )));

        Self {
            config,
            engine,
            store,
            state: Mutex::new(RecordingState::Idle),
            running: Arc::new(AtomicBool::new(false)),
            buffer,
            transcript: SharedTranscript::new(),
            extractor_task: tokio::sync::Mutex::new(None),
            coordinator_task: tokio::sync::Mutex::new(None),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RecordingState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_buffer(&self) -> MutexGuard<'_, FrameBuffer> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts recording.
    ///
    /// Resets the transcript, sequence numbering, and frame buffer, then
    /// spawns the extractor and coordinator tasks. Fails with
    /// `AlreadyRecording` unless the session is idle.
    pub async fn start(&self) -> Result<()> {
        {
            let mut state = self.lock_state();
            if *state != RecordingState::Idle {
                return Err(ScribeError::AlreadyRecording);
            }
            *state = RecordingState::Recording;
        }

        info!(engine = self.engine.name(), "starting recording session");

        self.transcript.reset();
        self.lock_buffer().clear();
        self.running.store(true, Ordering::SeqCst);

        let (queue_tx, queue_rx) = chunk_channel();
        let extractor = ChunkExtractor::new(
            self.config.chunking.clone(),
            &self.config.audio,
            Arc::clone(&self.buffer),
            Arc::clone(&self.running),
            queue_tx,
        );
        let coordinator = TranscriptionCoordinator::new(
            Arc::clone(&self.engine),
            self.store.clone(),
            self.transcript.clone(),
            self.config.storage.failure_fatal,
        );

        *self.extractor_task.lock().await = Some(tokio::spawn(extractor.run()));
        *self.coordinator_task.lock().await = Some(tokio::spawn(coordinator.run(queue_rx)));

        Ok(())
    }

    /// Stops recording and drains the pipeline.
    ///
    /// Idempotent: stopping an idle (or already stopping) session is a
    /// no-op. No new frames are accepted once stop is signaled; chunks
    /// already dispatched are transcribed before this returns, and an
    /// in-flight engine call completes and applies its result.
    pub async fn stop(&self) -> Result<()> {
        {
            let mut state = self.lock_state();
            match *state {
                RecordingState::Idle | RecordingState::Stopping => return Ok(()),
                RecordingState::Recording => *state = RecordingState::Stopping,
            }
        }

        info!("stopping recording session");
        self.running.store(false, Ordering::SeqCst);

        // The extractor exits on its next tick and drops the queue sender,
        // which lets the coordinator drain the backlog and finish.
        if let Some(task) = self.extractor_task.lock().await.take() {
            if let Err(e) = task.await {
                error!("extractor task panicked: {}", e);
            }
        }
        if let Some(task) = self.coordinator_task.lock().await.take() {
            if let Err(e) = task.await {
                error!("coordinator task panicked: {}", e);
            }
        }

        *self.lock_state() = RecordingState::Idle;
        info!("recording session stopped");
        Ok(())
    }

    /// Handle for the capture source to push frames through.
    pub fn capture_handle(&self) -> CaptureHandle {
        CaptureHandle {
            buffer: Arc::clone(&self.buffer),
            running: Arc::clone(&self.running),
        }
    }

    /// Full transcript text accumulated so far.
    pub fn transcript(&self) -> String {
        self.transcript.text()
    }

    /// Completed transcript segments in application order.
    pub fn segments(&self) -> Vec<TranscriptSegment> {
        self.transcript.segments()
    }

    pub fn state(&self) -> RecordingState {
        *self.lock_state()
    }

    pub fn is_recording(&self) -> bool {
        self.state() == RecordingState::Recording
    }

    /// True while a chunk is between dequeue and transcript commit.
    pub fn is_transcribing(&self) -> bool {
        self.transcript.is_transcribing()
    }
}

/// Cloneable handle used by the capture context.
///
/// `push` only appends to the in-memory buffer; it performs no I/O and
/// never blocks beyond the buffer lock, so it is safe to call from a
/// real-time capture callback.
#[derive(Clone)]
pub struct CaptureHandle {
    buffer: Arc<Mutex<FrameBuffer>>,
    running: Arc<AtomicBool>,
}

impl CaptureHandle {
    /// Pushes one captured frame. Frames arriving while the session is not
    /// recording are dropped silently.
    pub fn push(&self, frame: AudioFrame) {
        if !self.running.load(Ordering::SeqCst) {
            return;
        }
        self.buffer
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .append(&frame);
    }
}
