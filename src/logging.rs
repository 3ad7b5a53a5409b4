//! Log subscriber setup for the `vpc` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Logs go to stderr so stdout stays clean for results.

use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default filter for a `-v` count. `RUST_LOG`, when set, wins.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info,vehicle_profile_client=debug",
        _ => "debug,vehicle_profile_client=trace",
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(verbosity: u8) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(verbosity).into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::new(2, format!("failed to initialise logging: {e}")))
}
