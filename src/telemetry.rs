//! Diagnostic logging setup.
//!
//! The bot logs through `tracing`. The binary installs a compact fmt
//! subscriber filtered by `RUST_LOG`, falling back to `info` so replies,
//! rejections, and connection problems are visible by default.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Builds the filter used by [`init_tracing`].
#[must_use]
pub fn env_filter(default_level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

/// Installs the global subscriber.
///
/// Returns `false` when a subscriber was already installed, which leaves the
/// existing one in place.
#[must_use]
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(LevelFilter::INFO))
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
