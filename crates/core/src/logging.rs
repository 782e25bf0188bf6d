//! Logging initialization and configuration.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info,stage=debug,stage_scene=debug,winit=warn";

/// Initialize the logging system with tracing.
///
/// This sets up tracing-subscriber with:
/// - Environment-based filtering (RUST_LOG)
/// - Target names on every line
///
/// Calling it more than once is harmless; only the first call installs
/// the subscriber.
///
/// # Example
/// ```
/// stage_core::init_logging();
/// tracing::info!("Stage initialized");
/// ```
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
