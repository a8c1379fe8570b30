//! Shared transcript state.
//!
//! The transcript and the transcription-in-progress flag are the only
//! mutable state crossing from the coordinator to the UI side; both live
//! behind one mutex. The coordinator is the sole writer, so readers always
//! observe a prefix-consistent concatenation of completed segments.

use crate::streaming::frame::TranscriptSegment;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct TranscriptState {
    text: String,
    segments: Vec<TranscriptSegment>,
    transcribing: bool,
}

/// Cloneable handle to the transcript shared between coordinator and UI.
#[derive(Clone, Default)]
pub struct SharedTranscript {
    inner: Arc<Mutex<TranscriptState>>,
}

impl SharedTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TranscriptState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Full transcript text accumulated so far.
    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Completed segments in application order.
    pub fn segments(&self) -> Vec<TranscriptSegment> {
        self.lock().segments.clone()
    }

    /// Appends a completed segment at the tail.
    ///
    /// Text is concatenated verbatim; segment spacing is the engine's
    /// responsibility. The sequential coordinator guarantees segments arrive
    /// here in sequence order.
    pub fn append(&self, segment: TranscriptSegment) {
        let mut state = self.lock();
        state.text.push_str(&segment.text);
        state.segments.push(segment);
    }

    /// Clears text and segments; called when a recording starts.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.text.clear();
        state.segments.clear();
        state.transcribing = false;
    }

    pub fn set_transcribing(&self, transcribing: bool) {
        self.lock().transcribing = transcribing;
    }

    /// True while a chunk is between dequeue and commit.
    pub fn is_transcribing(&self) -> bool {
        self.lock().transcribing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(sequence: u64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            sequence,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_append_concatenates_verbatim() {
        let transcript = SharedTranscript::new();
        transcript.append(segment(1, "chunk1 "));
        transcript.append(segment(2, "chunk2 "));

        assert_eq!(transcript.text(), "chunk1 chunk2 ");
        assert_eq!(transcript.segments().len(), 2);
    }

    #[test]
    fn test_reset_clears_everything() {
        let transcript = SharedTranscript::new();
        transcript.append(segment(1, "old "));
        transcript.set_transcribing(true);

        transcript.reset();
        assert_eq!(transcript.text(), "");
        assert!(transcript.segments().is_empty());
        assert!(!transcript.is_transcribing());
    }

    #[test]
    fn test_transcribing_flag_roundtrip() {
        let transcript = SharedTranscript::new();
        assert!(!transcript.is_transcribing());
        transcript.set_transcribing(true);
        assert!(transcript.is_transcribing());
        transcript.set_transcribing(false);
        assert!(!transcript.is_transcribing());
    }

    #[test]
    fn test_clones_share_state() {
        let transcript = SharedTranscript::new();
        let reader = transcript.clone();
        transcript.append(segment(1, "hello "));
        assert_eq!(reader.text(), "hello ");
    }
}
