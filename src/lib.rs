pub mod config;
pub mod engine; // occurrence expansion, dose classification, compliance, alerts
pub mod models;
pub mod runner; // collaborator seams + periodic evaluation loop

use tracing_subscriber::EnvFilter;

/// Initialize structured logging for binaries embedding the engine.
///
/// Honors `RUST_LOG`; falls back to the crate default filter. Call once
/// at startup; the engine itself only emits `tracing` events and never
/// installs a subscriber.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
