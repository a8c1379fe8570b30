use crate::defaults;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub audio: AudioConfig,
    pub chunking: ChunkingConfig,
    pub storage: StorageConfig,
}

/// Audio format configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Native format the frame buffer accumulates in.
    pub capture_sample_rate: u32,
    pub capture_channels: u16,
    /// Format chunks are normalized to before encoding.
    pub target_sample_rate: u32,
    pub target_channels: u16,
}

/// Chunk extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_duration_secs: u64,
    pub poll_interval_ms: u64,
    /// Emit residual sub-chunk audio as a final partial chunk on stop.
    /// Discarded by default.
    pub flush_on_stop: bool,
}

/// Chunk persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Upload each chunk to the object store before transcription.
    pub persist_chunks: bool,
    /// When true, a failed upload drops the chunk entirely; when false the
    /// chunk is still transcribed without a stored reference.
    pub failure_fatal: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            capture_sample_rate: defaults::CAPTURE_SAMPLE_RATE,
            capture_channels: defaults::CAPTURE_CHANNELS,
            target_sample_rate: defaults::TARGET_SAMPLE_RATE,
            target_channels: defaults::TARGET_CHANNELS,
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_duration_secs: defaults::CHUNK_DURATION_SECS,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
            flush_on_stop: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            persist_chunks: true,
            failure_fatal: false,
        }
    }
}

impl ChunkingConfig {
    pub fn chunk_duration(&self) -> Duration {
        Duration::from_secs(self.chunk_duration_secs)
    }

    pub fn chunk_duration_ms(&self) -> u32 {
        (self.chunk_duration_secs * 1000) as u32
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields use default values.
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if it is missing.
    pub fn load_or_default(path: &Path) -> crate::error::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_defaults_module() {
        let config = PipelineConfig::default();
        assert_eq!(config.audio.target_sample_rate, 16000);
        assert_eq!(config.audio.target_channels, 1);
        assert_eq!(config.chunking.chunk_duration_secs, 8);
        assert_eq!(config.chunking.poll_interval_ms, 100);
        assert!(!config.chunking.flush_on_stop);
        assert!(config.storage.persist_chunks);
        assert!(!config.storage.failure_fatal);
    }

    #[test]
    fn test_partial_toml_uses_defaults_for_missing_fields() {
        let toml_str = r#"
            [chunking]
            chunk_duration_secs = 3

            [storage]
            persist_chunks = false
        "#;
        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chunking.chunk_duration_secs, 3);
        assert_eq!(config.chunking.poll_interval_ms, 100);
        assert!(!config.storage.persist_chunks);
        assert_eq!(config.audio.target_sample_rate, 16000);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let result: Result<PipelineConfig, _> = toml::from_str("chunking = 12");
        assert!(result.is_err());
    }

    #[test]
    fn test_duration_helpers() {
        let chunking = ChunkingConfig {
            chunk_duration_secs: 8,
            poll_interval_ms: 100,
            flush_on_stop: false,
        };
        assert_eq!(chunking.chunk_duration(), Duration::from_secs(8));
        assert_eq!(chunking.chunk_duration_ms(), 8000);
        assert_eq!(chunking.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            PipelineConfig::load_or_default(Path::new("/nonexistent/streamscribe.toml")).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[chunking]\nflush_on_stop = true\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert!(config.chunking.flush_on_stop);
    }
}
