//! Logging setup for the `respack` binary.
//!
//! The library logs through the `log` facade; this installs `env_logger` as
//! the backend, writing to stderr so stdout only carries the result line.
//! `RUST_LOG` overrides the level picked from `--verbose`.

use env_logger::Env;

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
