//! Transcription engine abstraction.
//!
//! The engine is an external collaborator: it accepts an encoded audio blob
//! plus the conversation context accumulated so far and returns transcribed
//! text. Latency is unbounded (seconds) and calls may fail transiently;
//! ordering is enforced by the coordinator, never assumed from the engine.

pub mod http;

use crate::error::{Result, ScribeError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Trait for remote (or mocked) transcription engines.
#[async_trait::async_trait]
pub trait TranscriptionEngine: Send + Sync {
    /// Transcribe one audio chunk.
    ///
    /// # Arguments
    /// * `audio` - Encoded audio blob (WAV by default)
    /// * `mime_type` - MIME type of the blob
    /// * `context` - Full transcript text accumulated so far
    async fn transcribe(&self, audio: &[u8], mime_type: &str, context: &str) -> Result<String>;

    /// Engine name for logging.
    fn name(&self) -> &str;
}

/// Mock engine for testing.
///
/// Responses come from a template where `{n}` is replaced by the 1-based
/// call number. Individual calls can be scripted to fail or to complete
/// after an artificial delay, and every received context is recorded so
/// tests can assert the read-after-write ordering contract.
pub struct MockEngine {
    template: String,
    failures: HashSet<u64>,
    delays: HashMap<u64, Duration>,
    calls: AtomicU64,
    contexts: Mutex<Vec<String>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            template: "mock transcription".to_string(),
            failures: HashSet::new(),
            delays: HashMap::new(),
            calls: AtomicU64::new(0),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Sets the response template; `{n}` expands to the call number.
    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// Makes the given 1-based call fail with an engine error.
    pub fn with_failure_on(mut self, call: u64) -> Self {
        self.failures.insert(call);
        self
    }

    /// Delays the given 1-based call before it completes.
    pub fn with_delay_on(mut self, call: u64, delay: Duration) -> Self {
        self.delays.insert(call, delay);
        self
    }

    /// Number of transcribe calls received so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Context strings received, in call order.
    pub fn recorded_contexts(&self) -> Vec<String> {
        self.contexts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for MockEngine {
    async fn transcribe(&self, _audio: &[u8], _mime_type: &str, context: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.contexts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(context.to_string());

        if let Some(delay) = self.delays.get(&call) {
            tokio::time::sleep(*delay).await;
        }

        if self.failures.contains(&call) {
            return Err(ScribeError::Engine {
                message: format!("mock failure on call {}", call),
            });
        }

        Ok(self.template.replace("{n}", &call.to_string()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
