//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use std::time::Duration;

use crate::constants::DEFAULT_RECORD_CACHE_TTL;
use crate::{RecordError, RecordResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    record_cache_ttl: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig` with the given single-record cache TTL.
    pub fn new(record_cache_ttl: Duration) -> Self {
        Self { record_cache_ttl }
    }

    /// Validity window applied to cached single-record lookups.
    pub fn record_cache_ttl(&self) -> Duration {
        self.record_cache_ttl
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_CACHE_TTL)
    }
}

/// Parse the record cache TTL from an optional environment value, in seconds.
///
/// If `value` is `None` or empty/whitespace, returns the default TTL.
pub fn cache_ttl_from_env_value(value: Option<String>) -> RecordResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| {
                RecordError::InvalidInput(format!(
                    "cache TTL must be a whole number of seconds, got {raw:?}"
                ))
            }),
        None => Ok(DEFAULT_RECORD_CACHE_TTL),
    }
}
