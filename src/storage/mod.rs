//! Object storage for chunk persistence.
//!
//! Storage is a durability/reference mechanism only; transcription
//! correctness never depends on it. The coordinator decides per
//! configuration whether an upload failure drops the chunk or merely its
//! stored reference.

use crate::error::{Result, ScribeError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Trait for chunk blob storage.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores a blob under the given name and returns a stable URI.
    async fn put(&self, name: &str, blob: &[u8]) -> Result<String>;
}

/// Filesystem-backed store writing blobs under a root directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Creates the store, ensuring the root directory exists.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, name: &str, blob: &[u8]) -> Result<String> {
        let path = self.root.join(name);
        tokio::fs::write(&path, blob)
            .await
            .map_err(|e| ScribeError::Storage {
                message: format!("failed to write {}: {}", path.display(), e),
            })?;
        Ok(format!("file://{}", path.display()))
    }
}

/// In-memory store for testing.
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    /// Number of leading puts that fail.
    failures_remaining: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            failures_remaining: AtomicU64::new(0),
        }
    }

    /// Makes the first `count` puts fail with a storage error.
    pub fn with_failures(self, count: u64) -> Self {
        self.failures_remaining.store(count, Ordering::SeqCst);
        self
    }

    /// Number of blobs stored so far.
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Stored blob names, unordered.
    pub fn object_names(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, name: &str, blob: &[u8]) -> Result<String> {
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(ScribeError::Storage {
                message: format!("scripted failure storing {}", name),
            });
        }

        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), blob.to_vec());
        Ok(format!("mem://{}", name))
    }
}
