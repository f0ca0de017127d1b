//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Initialize tracing with standard configuration. The level comes
/// from `RUST_LOG` when set, otherwise `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
