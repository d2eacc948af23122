//! Logging setup for binaries and tests embedding the client.
//!
//! The library itself only emits `tracing` events; nothing is printed
//! unless a subscriber is installed.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Maps a `-v` count to a level filter.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs a stderr fmt subscriber.
///
/// `RUST_LOG` directives take precedence over `verbosity`. Calling this
/// more than once is harmless; only the first call installs a subscriber.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbosity).into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
