//! Diagnostic logging.
//!
//! Standard output carries the manifest, so all tracing goes to standard
//! error. The default filter only lets warnings through, which keeps a
//! successful run silent; set `RUST_LOG=debug` to follow each step.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global subscriber. Later calls are no-ops.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
