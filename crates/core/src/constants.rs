//! Constants used throughout the medrec core crate.
//!
//! This module contains the persistence and cache key constants to ensure
//! consistency across the codebase and make maintenance easier.

use std::time::Duration;

/// Persistence key under which the full record collection blob is stored.
pub const RECORDS_COLLECTION_KEY: &str = "medical_records";

/// Cache key prefix for single-record entries (`record:<id>`).
pub const RECORD_CACHE_PREFIX: &str = "record:";

/// Cache key prefix for identity invalidation entries
/// (`invalidation:<patientEmail>` / `invalidation:<doctorId>`).
pub const INVALIDATION_CACHE_PREFIX: &str = "invalidation:";

/// Default validity window for cached single-record lookups.
pub const DEFAULT_RECORD_CACHE_TTL: Duration = Duration::from_secs(600);

/// Default directory for the record data store when none is configured.
pub const DEFAULT_DATA_DIR: &str = "record_data";

/// Prefix of generated record identifiers.
pub const RECORD_ID_PREFIX: &str = "rec_";
