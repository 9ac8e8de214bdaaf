//! Logging setup on top of `tracing-subscriber`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Builds the filter: `RUST_LOG` when set and valid, otherwise `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a compact stderr subscriber. Later calls are no-ops.
pub fn init_logging(default_level: &str) {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter(default_level))
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init();
    });
}
