//! Tracing subscriber setup for hosts that do not install their own.

use crate::config::BusConfig;
use crate::error::BusResult;

/// Install a `fmt` subscriber at the configured level.
///
/// If the host already installed a global subscriber, that one is kept and
/// this is a no-op.
pub fn init_tracing(config: &BusConfig) -> BusResult<()> {
    let level = config.level()?;
    if let Err(e) = tracing_subscriber::fmt().with_max_level(level).try_init() {
        tracing::debug!(error = %e, "global subscriber already installed");
    }
    Ok(())
}
