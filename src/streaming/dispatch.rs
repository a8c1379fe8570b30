//! Chunk handoff queue between the extraction and transcription sides.
//!
//! Unbounded FIFO: the producer never blocks and never fails under memory
//! pressure (queue growth is bounded by chunk duration times recording
//! length). The consumer can await the next chunk or drain whatever is
//! currently available without blocking.

use crate::streaming::frame::AudioChunk;
use tokio::sync::mpsc;

/// Creates a connected chunk queue pair.
pub fn chunk_channel() -> (ChunkSender, ChunkReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChunkSender { tx }, ChunkReceiver { rx })
}

/// Producer side of the handoff queue.
#[derive(Clone)]
pub struct ChunkSender {
    tx: mpsc::UnboundedSender<AudioChunk>,
}

impl ChunkSender {
    /// Pushes a chunk onto the queue without blocking.
    ///
    /// Returns false if the consumer side has been dropped.
    pub fn push(&self, chunk: AudioChunk) -> bool {
        self.tx.send(chunk).is_ok()
    }
}

/// Consumer side of the handoff queue.
pub struct ChunkReceiver {
    rx: mpsc::UnboundedReceiver<AudioChunk>,
}

impl ChunkReceiver {
    /// Awaits the next chunk; returns None once all senders are dropped and
    /// the queue is drained.
    pub async fn recv(&mut self) -> Option<AudioChunk> {
        self.rx.recv().await
    }

    /// Drains every chunk currently queued without waiting.
    pub fn drain_available(&mut self) -> Vec<AudioChunk> {
        let mut chunks = Vec::new();
        while let Ok(chunk) = self.rx.try_recv() {
            chunks.push(chunk);
        }
        chunks
    }
}
