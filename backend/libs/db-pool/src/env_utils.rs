//! Environment variable parsing utilities
//!
//! Provides safe, ergonomic functions for parsing environment variables
//! with sensible defaults, eliminating the need for unwrap() calls.

use std::fmt::Display;
use std::str::FromStr;

/// Parse an environment variable with a default fallback.
///
/// Missing and unparsable values both yield `default`.
///
/// # Example
/// ```ignore
/// let timeout: u64 = parse_env_with_default("TIMEOUT_SECS", 30);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse an environment variable, falling back to `default` only when the
/// variable is unset. A value that is present but invalid is an error.
///
/// # Example
/// ```ignore
/// let port: u16 = parse_env_or_default("PORT", 8000)?;
/// ```
pub fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    Ok(parse_env_optional(key)?.unwrap_or(default))
}

/// Parse an optional environment variable. Unset yields `Ok(None)`, an
/// invalid value yields an error.
pub fn parse_env_optional<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(None),
    }
}
