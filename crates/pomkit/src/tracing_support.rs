//! Log output for test runs.
//!
//! pomkit emits `tracing` records from the wait loop and the audit. Install
//! a subscriber once per test binary to see them:
//!
//! ```
//! pomkit::tracing_support::init_logging("pomkit=debug");
//! ```
//!
//! The `POMKIT_LOG` environment variable overrides the directive, e.g.
//! `POMKIT_LOG=pomkit::wait=trace cargo test`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "POMKIT_LOG";

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install a human-readable subscriber writing through the test writer.
///
/// Safe to call from every test: only the first call installs anything.
/// Returns whether this call installed the subscriber.
pub fn init_logging(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .with_target(false)
        .with_test_writer()
        .try_init()
        .is_ok()
}

/// Install a JSON subscriber, one record per line, for CI log collection
pub fn init_json_logging(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter(default_directive))
        .with_test_writer()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let _ = init_logging("pomkit=trace");
        assert!(!init_logging("pomkit=trace"));
        assert!(!init_json_logging("pomkit=trace"));
    }

    #[test]
    fn test_filter_falls_back_to_directive() {
        if std::env::var_os(LOG_ENV).is_none() {
            assert_eq!(filter("pomkit=warn").to_string(), "pomkit=warn");
        }
    }
}
