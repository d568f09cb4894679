//! Structured logging bootstrap (`tracing` + `tracing-subscriber`), called
//! once by the host process before constructing an [`crate::engine::Engine`].
//! The core itself never calls this — a library should not configure
//! process-wide logging on behalf of its embedder.

use tracing_subscriber::EnvFilter;

/// Initializes a global `tracing` subscriber reading `RUST_LOG` (default
/// `info`). Safe to call once; a second call is a no-op logged at `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    if let Err(err) = result {
        tracing::warn!(%err, "tracing subscriber already initialized");
    }
}
