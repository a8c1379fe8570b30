//! Chunk extractor for the streaming pipeline.
//!
//! A timer-driven task that cuts fixed-duration chunks off the frame buffer
//! once both a minimum elapsed time and a minimum buffered duration are
//! satisfied, normalizes them (mono, target sample rate), encodes them as
//! WAV, and hands them to the dispatch queue. Duration targets are soft: a
//! tick with insufficient data is a no-op, never a blocking wait.

use crate::audio;
use crate::config::{AudioConfig, ChunkingConfig};
use crate::error::Result;
use crate::streaming::dispatch::ChunkSender;
use crate::streaming::frame::AudioChunk;
use crate::streaming::frame_buffer::FrameBuffer;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Timer-driven chunk extraction task.
pub struct ChunkExtractor {
    chunking: ChunkingConfig,
    target_sample_rate: u32,
    buffer: Arc<Mutex<FrameBuffer>>,
    running: Arc<AtomicBool>,
    queue: ChunkSender,
    /// Next sequence number to assign; 1-based, gap-free per recording.
    next_sequence: u64,
}

impl ChunkExtractor {
    pub fn new(
        chunking: ChunkingConfig,
        audio: &AudioConfig,
        buffer: Arc<Mutex<FrameBuffer>>,
        running: Arc<AtomicBool>,
        queue: ChunkSender,
    ) -> Self {
        if audio.target_channels != 1 {
            warn!(
                target_channels = audio.target_channels,
                "multichannel chunk targets are not supported; chunks are normalized to mono"
            );
        }

        Self {
            chunking,
            target_sample_rate: audio.target_sample_rate,
            buffer,
            running,
            queue,
            next_sequence: 1,
        }
    }

    fn lock_buffer(&self) -> MutexGuard<'_, FrameBuffer> {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs the extraction loop until the running flag clears.
    ///
    /// On exit, residual sub-chunk audio is either flushed as one final
    /// partial chunk or discarded, per configuration.
    pub async fn run(mut self) {
        let poll_interval = self.chunking.poll_interval();
        let chunk_duration = self.chunking.chunk_duration();
        let chunk_ms = self.chunking.chunk_duration_ms();
        let mut last_cut = tokio::time::Instant::now();

        debug!(
            chunk_ms,
            poll_ms = self.chunking.poll_interval_ms,
            "chunk extractor started"
        );

        while self.running.load(Ordering::SeqCst) {
            tokio::time::sleep(poll_interval).await;

            if last_cut.elapsed() < chunk_duration {
                continue;
            }

            match self.cut_chunk(chunk_ms) {
                // The elapsed timer restarts only when a chunk was actually cut
                Ok(true) => last_cut = tokio::time::Instant::now(),
                Ok(false) => {}
                Err(e) => warn!("dropping chunk after encoding failure: {}", e),
            }
        }

        if self.chunking.flush_on_stop {
            if let Err(e) = self.flush_residual() {
                warn!("dropping final partial chunk: {}", e);
            }
        } else {
            let mut buffer = self.lock_buffer();
            let residual_ms = buffer.buffered_ms();
            buffer.clear();
            if residual_ms > 0 {
                debug!(residual_ms, "discarding residual audio below one chunk");
            }
        }

        debug!("chunk extractor stopped");
    }

    /// Cuts one full chunk if enough audio is buffered.
    ///
    /// Returns Ok(false) on an insufficient-data tick (soft no-op).
    fn cut_chunk(&mut self, duration_ms: u32) -> Result<bool> {
        let (samples, native_rate, native_channels) = {
            let mut buffer = self.lock_buffer();
            match buffer.take_prefix(duration_ms) {
                Ok(samples) => (samples, buffer.sample_rate(), buffer.channels()),
                Err(e) if e.is_soft() => return Ok(false),
                Err(e) => return Err(e),
            }
        };

        self.emit(&samples, native_rate, native_channels)?;
        Ok(true)
    }

    /// Emits whatever remains in the buffer as a final partial chunk.
    fn flush_residual(&mut self) -> Result<()> {
        let (samples, native_rate, native_channels) = {
            let mut buffer = self.lock_buffer();
            (buffer.take_all(), buffer.sample_rate(), buffer.channels())
        };

        if samples.is_empty() {
            return Ok(());
        }
        debug!("flushing final partial chunk");
        self.emit(&samples, native_rate, native_channels)
    }

    /// Normalizes, encodes, and dispatches one chunk.
    ///
    /// The sequence number is consumed only after a successful dispatch, so
    /// encoding failures leave the numbering gap-free.
    fn emit(&mut self, samples: &[i16], native_rate: u32, native_channels: u16) -> Result<()> {
        let mono = audio::downmix_to_mono(samples, native_channels);
        let normalized = audio::resample(&mono, native_rate, self.target_sample_rate);
        let duration_ms = (normalized.len() as u64 * 1000 / self.target_sample_rate as u64) as u32;
        let wav = audio::encode_wav(&normalized, self.target_sample_rate)?;

        let chunk = AudioChunk {
            sequence: self.next_sequence,
            wav,
            duration_ms,
            created_at: Utc::now(),
        };

        debug!(
            sequence = chunk.sequence,
            duration_ms, "chunk extracted and dispatched"
        );

        if self.queue.push(chunk) {
            self.next_sequence += 1;
        } else {
            // Consumer gone; recording is shutting down
            self.running.store(false, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::dispatch::chunk_channel;
    use crate::streaming::frame::AudioFrame;
    use std::time::Duration;

    fn test_setup(
        chunking: ChunkingConfig,
    ) -> (
        Arc<Mutex<FrameBuffer>>,
        Arc<AtomicBool>,
        ChunkExtractor,
        crate::streaming::dispatch::ChunkReceiver,
    ) {
        let audio_cfg = AudioConfig {
            capture_sample_rate: 16000,
            capture_channels: 1,
            target_sample_rate: 16000,
            target_channels: 1,
        };
        let buffer = Arc::new(Mutex::new(FrameBuffer::new(16000, 1)));
        let running = Arc::new(AtomicBool::new(true));
        let (tx, rx) = chunk_channel();
        let extractor = ChunkExtractor::new(
            chunking,
            &audio_cfg,
            Arc::clone(&buffer),
            Arc::clone(&running),
            tx,
        );
        (buffer, running, extractor, rx)
    }

    fn fast_chunking() -> ChunkingConfig {
        ChunkingConfig {
            chunk_duration_secs: 1,
            poll_interval_ms: 50,
            flush_on_stop: false,
        }
    }

    fn push_audio(buffer: &Arc<Mutex<FrameBuffer>>, ms: u32) {
        let samples = vec![500i16; (ms as usize) * 16];
        buffer
            .lock()
            .unwrap()
            .append(&AudioFrame::new(samples, 16000, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_sequential_chunks_from_buffered_audio() {
        let (buffer, running, extractor, mut rx) = test_setup(fast_chunking());
        push_audio(&buffer, 3000);

        let task = tokio::spawn(extractor.run());
        tokio::time::sleep(Duration::from_millis(3200)).await;
        running.store(false, Ordering::SeqCst);
        task.await.unwrap();

        let chunks = rx.drain_available();
        assert_eq!(chunks.len(), 3);
        let sequences: Vec<u64> = chunks.iter().map(|c| c.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        for chunk in &chunks {
            assert_eq!(chunk.duration_ms, 1000);
            assert!(!chunk.wav.is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_insufficient_data_tick_is_a_noop() {
        let (buffer, running, extractor, mut rx) = test_setup(fast_chunking());
        push_audio(&buffer, 400); // below one chunk

        let task = tokio::spawn(extractor.run());
        tokio::time::sleep(Duration::from_millis(2500)).await;
        running.store(false, Ordering::SeqCst);
        task.await.unwrap();

        assert!(rx.drain_available().is_empty());
        // Residual was discarded on exit (flush_on_stop = false)
        assert!(buffer.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_on_stop_emits_partial_chunk() {
        let chunking = ChunkingConfig {
            flush_on_stop: true,
            ..fast_chunking()
        };
        let (buffer, running, extractor, mut rx) = test_setup(chunking);
        push_audio(&buffer, 400);

        let task = tokio::spawn(extractor.run());
        tokio::time::sleep(Duration::from_millis(100)).await;
        running.store(false, Ordering::SeqCst);
        task.await.unwrap();

        let chunks = rx.drain_available();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].sequence, 1);
        assert_eq!(chunks[0].duration_ms, 400);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chunks_are_normalized_to_target_rate_mono() {
        let audio_cfg = AudioConfig {
            capture_sample_rate: 48000,
            capture_channels: 2,
            target_sample_rate: 16000,
            target_channels: 1,
        };
        let buffer = Arc::new(Mutex::new(FrameBuffer::new(48000, 2)));
        let running = Arc::new(AtomicBool::new(true));
        let (tx, mut rx) = chunk_channel();
        let extractor = ChunkExtractor::new(
            fast_chunking(),
            &audio_cfg,
            Arc::clone(&buffer),
            Arc::clone(&running),
            tx,
        );

        // 1s of 48kHz stereo
        buffer
            .lock()
            .unwrap()
            .append(&AudioFrame::new(vec![1000i16; 96000], 48000, 2));

        let task = tokio::spawn(extractor.run());
        tokio::time::sleep(Duration::from_millis(1200)).await;
        running.store(false, Ordering::SeqCst);
        task.await.unwrap();

        let chunks = rx.drain_available();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].duration_ms, 1000);

        let reader = hound::WavReader::new(std::io::Cursor::new(chunks[0].wav.clone())).unwrap();
        assert_eq!(reader.spec().sample_rate, 16000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 16000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_extractor_stops_when_consumer_dropped() {
        let (buffer, running, extractor, rx) = test_setup(fast_chunking());
        push_audio(&buffer, 2000);
        drop(rx);

        let task = tokio::spawn(extractor.run());
        tokio::time::sleep(Duration::from_millis(1200)).await;
        task.await.unwrap();

        assert!(!running.load(Ordering::SeqCst));
    }
}
