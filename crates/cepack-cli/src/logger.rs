//! Logging setup for the cepack CLI.
//!
//! Verbosity is controlled by the global flags:
//! 1. `--verbose`: debug for the cepack crates
//! 2. `--quiet`: errors only
//! 3. otherwise `RUST_LOG`, falling back to info
//!
//! Logs go to stderr so `cepack config` output can be piped.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "cepack=debug,cepack_config=debug,cepack_cli=debug";
const QUIET_FILTER: &str = "cepack=error,cepack_config=error,cepack_cli=error";
const DEFAULT_FILTER: &str = "cepack=info,cepack_config=info,cepack_cli=info";

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

/// Whether stderr output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise it
/// depends on whether stderr is a terminal.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse() {
        // EnvFilter::new ignores invalid directives, so check they survive a strict parse
        for filter in [VERBOSE_FILTER, QUIET_FILTER, DEFAULT_FILTER] {
            assert!(EnvFilter::try_new(filter).is_ok(), "{filter}");
        }
    }
}
