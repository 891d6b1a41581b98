pub mod canvas;
pub mod commands;
pub mod config;
pub mod editor;
pub mod errors;
pub mod focus;
pub mod geometry;

/// Install the global `tracing` subscriber for hosts that don't bring their
/// own. `RUST_LOG` overrides the default `info` filter. Safe to call twice.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
