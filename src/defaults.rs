//! Default configuration constants for streamscribe.
//!
//! Shared across configuration types to keep the pipeline components in
//! agreement about audio formats and timing.

/// Target sample rate for normalized chunks, in Hz.
///
/// 16kHz is the standard input rate for speech transcription engines and
/// keeps chunk payloads small relative to capture rates.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Target channel count for normalized chunks (mono).
pub const TARGET_CHANNELS: u16 = 1;

/// Default capture sample rate in Hz.
///
/// Matches common audio hardware output; frames in a different format are
/// converted on append.
pub const CAPTURE_SAMPLE_RATE: u32 = 48_000;

/// Default capture channel count (stereo).
pub const CAPTURE_CHANNELS: u16 = 2;

/// Default chunk duration in seconds.
///
/// Eight seconds gives the engine enough context to resolve sentence
/// boundaries while keeping transcript latency tolerable.
pub const CHUNK_DURATION_SECS: u64 = 8;

/// Extractor polling interval in milliseconds.
///
/// The extractor checks elapsed time and buffered duration on this cadence;
/// chunk boundaries are therefore best-effort within one interval.
pub const POLL_INTERVAL_MS: u64 = 100;

/// MIME type of encoded chunk payloads.
pub const CHUNK_MIME_TYPE: &str = "audio/wav";
