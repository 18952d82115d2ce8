//! Logger setup for the command-line driver

use std::io::IsTerminal;

use tracing::subscriber::DefaultGuard;
use tracing::Level;

/// Maximum level for a run: INFO when verbose, WARN otherwise
pub fn level_for(verbose: bool) -> Level {
    if verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// Install a stderr subscriber for the current thread.
///
/// The subscriber stays active until the returned guard is dropped, so the
/// caller owns the logger for as long as it keeps the guard alive.
pub fn init_logging(verbose: bool) -> DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level_for(verbose))
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}
