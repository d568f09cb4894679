//! Layered engine configuration.
//!
//! Defaults are baked in; a TOML file (if given to [`Engine::new`]) overrides
//! individual fields. Mirrors the `toml`-backed startup configuration style
//! used throughout the pack (`aetherlight-core`, `akh-medu`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_pattern_set_name() -> String {
    "default".to_string()
}

fn default_person_min_confidence() -> f64 {
    0.7
}

fn default_max_document_bytes() -> usize {
    32 * 1024 * 1024 // 32 MiB
}

fn default_deadline_ms() -> u64 {
    5_000
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("corpora")
}

/// Deployment knobs fixed at engine construction. Never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_pattern_set_name")]
    pub pattern_set_name: String,

    #[serde(default = "default_person_min_confidence")]
    pub person_min_confidence: f64,

    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,

    #[serde(default = "default_deadline_ms")]
    pub per_document_deadline_ms: u64,

    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            pattern_set_name: default_pattern_set_name(),
            person_min_confidence: default_person_min_confidence(),
            max_document_bytes: default_max_document_bytes(),
            per_document_deadline_ms: default_deadline_ms(),
            corpus_dir: default_corpus_dir(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// any field the file omits.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigUnreadable {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }
}
