//! Transcription coordinator.
//!
//! Consumes dispatched chunks strictly in arrival order. Each chunk is
//! optionally persisted, then sent to the engine together with the full
//! transcript committed so far, and the returned text is appended under the
//! transcript lock. The consumer is strictly sequential: the call for chunk
//! N+1 is issued only after chunk N's outcome has been applied, because each
//! request's context depends on all previously committed text. Per-chunk
//! failures are logged and isolated; they never stall the pipeline.

use crate::defaults;
use crate::engine::TranscriptionEngine;
use crate::error::Result;
use crate::storage::ObjectStore;
use crate::streaming::dispatch::ChunkReceiver;
use crate::streaming::frame::{AudioChunk, TranscriptSegment};
use crate::streaming::transcript::SharedTranscript;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct TranscriptionCoordinator {
    engine: Arc<dyn TranscriptionEngine>,
    store: Option<Arc<dyn ObjectStore>>,
    transcript: SharedTranscript,
    /// When true, a failed upload drops the chunk instead of transcribing
    /// it without a stored reference.
    storage_failure_fatal: bool,
}

impl TranscriptionCoordinator {
    pub fn new(
        engine: Arc<dyn TranscriptionEngine>,
        store: Option<Arc<dyn ObjectStore>>,
        transcript: SharedTranscript,
        storage_failure_fatal: bool,
    ) -> Self {
        Self {
            engine,
            store,
            transcript,
            storage_failure_fatal,
        }
    }

    /// Consumes chunks until the queue closes and is fully drained.
    pub async fn run(self, mut queue: ChunkReceiver) {
        debug!(engine = self.engine.name(), "transcription coordinator started");

        while let Some(chunk) = queue.recv().await {
            let sequence = chunk.sequence;
            self.transcript.set_transcribing(true);
            let outcome = self.process_chunk(chunk).await;
            self.transcript.set_transcribing(false);

            if let Err(e) = outcome {
                warn!(sequence, "chunk dropped from transcript: {}", e);
            }
        }

        debug!("transcription coordinator stopped");
    }

    async fn process_chunk(&self, chunk: AudioChunk) -> Result<()> {
        if let Some(store) = &self.store {
            match store.put(&chunk.blob_name(), &chunk.wav).await {
                Ok(uri) => debug!(sequence = chunk.sequence, uri, "chunk persisted"),
                Err(e) if self.storage_failure_fatal => return Err(e),
                Err(e) => {
                    warn!(
                        sequence = chunk.sequence,
                        "chunk upload failed, transcribing without a reference: {}", e
                    );
                }
            }
        }

        // Read-after-write: the context must include every segment committed
        // by the preceding chunks, which sequential processing guarantees.
        let context = self.transcript.text();
        let text = self
            .engine
            .transcribe(&chunk.wav, defaults::CHUNK_MIME_TYPE, &context)
            .await?;

        info!(
            sequence = chunk.sequence,
            chars = text.len(),
            "transcript segment applied"
        );
        self.transcript.append(TranscriptSegment {
            sequence: chunk.sequence,
            text,
        });
        Ok(())
    }
}
