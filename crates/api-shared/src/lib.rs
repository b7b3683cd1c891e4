//! # API Shared
//!
//! Shared types and definitions for the medrec APIs.
//!
//! Contains:
//! - Domain types (`record` module): [`MedicalRecord`], [`RecordType`] and the
//!   create/update payloads
//! - Wire envelopes (`wire` module): request and response bodies for the REST surface
//! - Shared services like `HealthService`
//!
//! Used by `medrec-core`, `api-rest` and `medrec-cli` for common functionality.

pub mod health;
pub mod record;
pub mod wire;

pub use health::HealthService;
pub use record::{MedicalRecord, RecordDraft, RecordPatch, RecordSource, RecordType};
