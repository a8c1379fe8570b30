//! Data types flowing through the streaming pipeline.

use chrono::{DateTime, Utc};

/// Raw audio delivered by a capture source.
///
/// Ephemeral: produced by the capture callback and consumed immediately by
/// the frame buffer.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Interleaved 16-bit PCM samples.
    pub samples: Vec<i16>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of interleaved channels.
    pub channels: u16,
}

impl AudioFrame {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Returns the duration of this frame in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000 / (self.sample_rate as u64 * self.channels as u64)) as u32
    }
}

/// An immutable, normalized segment of audio ready for transcription.
///
/// Created by the chunk extractor, consumed exactly once by the coordinator.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// 1-based, strictly increasing, gap-free across one recording.
    pub sequence: u64,
    /// WAV-encoded audio at the target rate, mono.
    pub wav: Vec<u8>,
    /// Duration of the chunk in milliseconds.
    pub duration_ms: u32,
    /// Wall-clock extraction time, used for stored blob naming.
    pub created_at: DateTime<Utc>,
}

impl AudioChunk {
    /// Name under which this chunk is persisted to object storage.
    pub fn blob_name(&self) -> String {
        format!(
            "audio_chunk_{}_{:04}.wav",
            self.created_at.format("%Y%m%d_%H%M%S"),
            self.sequence
        )
    }
}

/// Text returned by the transcription engine for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    /// Sequence number of the chunk this text was transcribed from.
    pub sequence: u64,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration_mono() {
        let frame = AudioFrame::new(vec![0i16; 16000], 16000, 1);
        assert_eq!(frame.duration_ms(), 1000);
    }

    #[test]
    fn test_frame_duration_stereo() {
        // 9600 interleaved samples at 48kHz stereo = 100ms
        let frame = AudioFrame::new(vec![0i16; 9600], 48000, 2);
        assert_eq!(frame.duration_ms(), 100);
    }

    #[test]
    fn test_frame_duration_degenerate_format() {
        let frame = AudioFrame::new(vec![0i16; 100], 0, 0);
        assert_eq!(frame.duration_ms(), 0);
    }

    #[test]
    fn test_chunk_blob_name_embeds_timestamp_and_sequence() {
        let chunk = AudioChunk {
            sequence: 7,
            wav: Vec::new(),
            duration_ms: 8000,
            created_at: DateTime::parse_from_rfc3339("2024-05-01T12:30:45Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        assert_eq!(chunk.blob_name(), "audio_chunk_20240501_123045_0007.wav");
    }
}
