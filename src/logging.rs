//! Logger setup for the `cauldron` and `selfplay` binaries.
//!
//! The game host reads one command per turn from stdout, so every log line
//! goes to stderr.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Default filter: turn summaries at info, planner traces at debug.
fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the stderr logger. `RUST_LOG` takes precedence over `verbose`.
///
/// Calling this again is a no-op; the first logger installed stays.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_level(verbose).to_string());
    let mut builder = Builder::from_env(env);
    builder.target(Target::Stderr).format_timestamp(None);

    if builder.try_init().is_err() {
        log::trace!("logger already installed");
    }
}
