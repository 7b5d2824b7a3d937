//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// What a manager does when a cache write or invalidation fails after the
/// store has already committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheWritePolicy {
    /// Log a warning and report the request as successful
    #[default]
    BestEffort,
    /// Fail the request with an internal error
    Strict,
}

impl FromStr for CacheWritePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" | "best_effort" | "warn" => Ok(Self::BestEffort),
            "strict" | "fail" => Ok(Self::Strict),
            other => Err(format!("unknown cache write policy '{}'", other)),
        }
    }
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// TTL in seconds applied to every cache write
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Handling of post-commit cache failures
    pub cache_write_policy: CacheWritePolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `CACHE_TTL` - TTL of every cache entry in seconds (default: 600)
    /// - `CLEANUP_INTERVAL` - Expired-entry sweep frequency in seconds (default: 30)
    /// - `CACHE_WRITE_POLICY` - `best-effort` or `strict` (default: best-effort)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES")
                .unwrap_or(defaults.cache_max_entries),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            cache_write_policy: parse_var("CACHE_WRITE_POLICY")
                .unwrap_or(defaults.cache_write_policy),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

fn parse_var<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    parse_value(name, env::var(name).ok())
}

/// Parses a set value; one that fails to parse is logged and ignored so the
/// default applies.
fn parse_value<T>(name: &str, raw: Option<String>) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(
                var = name,
                value = %raw,
                error = %err,
                "ignoring unparsable setting, using default"
            );
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            cache_max_entries: 1000,
            cache_ttl: crate::cache::keys::DEFAULT_ENTRY_TTL.as_secs(),
            cleanup_interval: 30,
            cache_write_policy: CacheWritePolicy::BestEffort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache_max_entries, 1000);
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.cleanup_interval, 30);
        assert_eq!(config.cache_write_policy, CacheWritePolicy::BestEffort);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("CACHE_TTL");
        env::remove_var("CLEANUP_INTERVAL");
        env::remove_var("CACHE_WRITE_POLICY");

        let config = Config::from_env();
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache_ttl, 600);
        assert_eq!(config.cache_write_policy, CacheWritePolicy::BestEffort);
    }

    #[test]
    fn test_cache_write_policy_parse() {
        assert_eq!(
            "strict".parse::<CacheWritePolicy>(),
            Ok(CacheWritePolicy::Strict)
        );
        assert_eq!(
            "Best-Effort".parse::<CacheWritePolicy>(),
            Ok(CacheWritePolicy::BestEffort)
        );
        assert!("sometimes".parse::<CacheWritePolicy>().is_err());
    }

    #[test]
    fn test_unparsable_setting_falls_back() {
        let policy: Option<CacheWritePolicy> =
            parse_value("CACHE_WRITE_POLICY", Some("stirct".to_string()));
        assert_eq!(policy, None);

        let policy: Option<CacheWritePolicy> =
            parse_value("CACHE_WRITE_POLICY", Some("strict".to_string()));
        assert_eq!(policy, Some(CacheWritePolicy::Strict));

        let port: Option<u16> = parse_value("SERVER_PORT", Some("80800".to_string()));
        assert_eq!(port, None);
        assert_eq!(parse_value::<u16>("SERVER_PORT", None), None);
    }
}
