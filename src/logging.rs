// src/logging.rs
// =============================================================================
// Sets up the diagnostic stream. Everything logged goes to stderr, so stdout
// only ever carries matched URLs.
//
// Levels:
// - our crate: info by default, debug with --verbose
// - dependencies: warn
// - a non-empty RUST_LOG replaces both defaults
// =============================================================================

use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

pub fn setup_logging(verbose: bool) {
    let rust_log = std::env::var("RUST_LOG").ok();
    logger_builder(verbose, rust_log.as_deref()).init();
}

// `rust_log` is the raw RUST_LOG value. When it's set, its directives are the
// only ones applied, so RUST_LOG=debug really does mean debug everywhere.
fn logger_builder(verbose: bool, rust_log: Option<&str>) -> Builder {
    let mut builder = Builder::new();

    match rust_log.filter(|filters| !filters.trim().is_empty()) {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None => {
            let level = if verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            };
            builder
                .filter_level(LevelFilter::Warn)
                .filter_module(env!("CARGO_CRATE_NAME"), level);
        }
    }

    builder.format(|buf, record| {
        let name = env!("CARGO_PKG_NAME");
        match record.level() {
            Level::Error | Level::Warn => {
                writeln!(buf, "[{} {}] {}", name, record.level(), record.args())
            }
            _ => writeln!(buf, "[{}] {}", name, record.args()),
        }
    });

    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_logger::Logger;
    use log::{Log, Metadata};

    const CRATE: &str = concat!(env!("CARGO_CRATE_NAME"), "::probe::worker");

    fn logger(verbose: bool, rust_log: Option<&str>) -> Logger {
        logger_builder(verbose, rust_log).build()
    }

    fn enabled(logger: &Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_default_levels() {
        let logger = logger(false, None);
        assert!(enabled(&logger, CRATE, Level::Info));
        assert!(!enabled(&logger, CRATE, Level::Debug));
        assert!(enabled(&logger, "hyper", Level::Warn));
        assert!(!enabled(&logger, "hyper", Level::Info));
    }

    #[test]
    fn test_verbose_enables_debug_for_crate_only() {
        let logger = logger(true, None);
        assert!(enabled(&logger, CRATE, Level::Debug));
        assert!(!enabled(&logger, "hyper", Level::Debug));
    }

    #[test]
    fn test_rust_log_raises_level() {
        let logger = logger(false, Some("debug"));
        assert!(enabled(&logger, CRATE, Level::Debug));
    }

    #[test]
    fn test_rust_log_lowers_crate_level() {
        let filters = format!("{}=error", env!("CARGO_CRATE_NAME"));
        let logger = logger(false, Some(&filters));
        assert!(enabled(&logger, CRATE, Level::Error));
        assert!(!enabled(&logger, CRATE, Level::Warn));
    }

    #[test]
    fn test_empty_rust_log_keeps_defaults() {
        let logger = logger(true, Some(""));
        assert!(enabled(&logger, CRATE, Level::Debug));
    }
}
