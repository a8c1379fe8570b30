//! Frame buffer for unconsumed capture audio.
//!
//! Accumulates raw samples between chunk boundaries. Owned exclusively by
//! the capture/extraction pair: the capture callback appends, the extractor
//! slices prefixes off the head. All operations are pure memory work so the
//! capture side never blocks on I/O.

use crate::audio;
use crate::error::{Result, ScribeError};
use crate::streaming::frame::AudioFrame;

/// Growable sample buffer in a fixed native format.
#[derive(Debug)]
pub struct FrameBuffer {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl FrameBuffer {
    /// Creates an empty buffer accumulating in the given native format.
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
            channels,
        }
    }

    /// Interleaved samples per millisecond of audio.
    fn samples_per_ms(&self) -> u64 {
        self.sample_rate as u64 * self.channels as u64 / 1000
    }

    /// Total buffered duration in milliseconds.
    pub fn buffered_ms(&self) -> u32 {
        let per_ms = self.samples_per_ms();
        if per_ms == 0 {
            return 0;
        }
        (self.samples.len() as u64 / per_ms) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Appends a frame to the tail.
    ///
    /// Frames in a different format than the buffer's native one are
    /// converted (downmix, then linear resample) before appending.
    pub fn append(&mut self, frame: &AudioFrame) {
        if frame.sample_rate == self.sample_rate && frame.channels == self.channels {
            self.samples.extend_from_slice(&frame.samples);
            return;
        }

        // Convert through mono; native multichannel buffers duplicate the
        // mono signal across channels to keep interleaving consistent.
        let mono = audio::downmix_to_mono(&frame.samples, frame.channels);
        let resampled = audio::resample(&mono, frame.sample_rate, self.sample_rate);
        if self.channels == 1 {
            self.samples.extend_from_slice(&resampled);
        } else {
            for sample in resampled {
                for _ in 0..self.channels {
                    self.samples.push(sample);
                }
            }
        }
    }

    /// Atomically removes and returns exactly `duration_ms` worth of samples
    /// from the head.
    ///
    /// Fails with `InsufficientData` (buffer unmodified) when less than
    /// `duration_ms` is buffered.
    pub fn take_prefix(&mut self, duration_ms: u32) -> Result<Vec<i16>> {
        let mut wanted = duration_ms as u64 * self.samples_per_ms();
        // Never split an interleaved frame group; the remainder must stay
        // channel-aligned.
        if self.channels > 1 {
            wanted -= wanted % self.channels as u64;
        }
        if (self.samples.len() as u64) < wanted {
            return Err(ScribeError::InsufficientData {
                requested_ms: duration_ms,
                buffered_ms: self.buffered_ms(),
            });
        }

        Ok(self.samples.drain(..wanted as usize).collect())
    }

    /// Removes and returns everything currently buffered.
    pub fn take_all(&mut self) -> Vec<i16> {
        std::mem::take(&mut self.samples)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}
