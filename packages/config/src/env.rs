// ABOUTME: Typed environment variable parsing helpers
// ABOUTME: Reads env vars with fallback defaults, warning on unparseable values

use std::str::FromStr;
use tracing::warn;

/// Read an environment variable, falling back to `default` when it is unset.
pub fn env_with_fallback(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, falling back to `default` when it
/// is unset or fails to parse. A set-but-unparseable value logs a warning
/// rather than aborting startup.
pub fn parse_env_with_fallback<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(var = name, value = %raw, "ignoring unparseable environment variable");
                default
            }
        },
        Err(_) => default,
    }
}
