//! Error taxonomy for engine construction and per-document processing.

use thiserror::Error;

/// Fatal errors raised while constructing an [`crate::engine::Engine`].
///
/// A `ConfigError` aborts engine startup; the host process must not serve
/// documents against a partially-constructed engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("corpus directory not found: {0}")]
    CorpusDirMissing(String),

    #[error("failed to read corpus file {path}: {source}")]
    CorpusFileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pattern '{name}' in set '{set}' failed to compile: {source}")]
    PatternCompile {
        set: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern set '{0}' is empty or undefined")]
    EmptyPatternSet(String),

    #[error("malformed config file {path}: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read config file {path}: {source}")]
    ConfigUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable, per-document errors. None of these propagate across
/// documents; each is folded into that document's [`crate::diagnostics::Diagnostics`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document exceeds max_document_bytes ({actual} > {limit})")]
    TooLarge { actual: usize, limit: usize },

    #[error("per-document deadline exceeded after {elapsed_ms}ms")]
    DeadlineExceeded { elapsed_ms: u64 },

    #[error("document is not valid UTF-8 at byte {0}")]
    InvalidUtf8(usize),

    #[error("unknown pattern set '{0}'")]
    UnknownPatternSet(String),

    #[error("internal error in stage '{stage}': {message}")]
    Internal { stage: &'static str, message: String },
}
