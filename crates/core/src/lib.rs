//! # Medrec Core
//!
//! Core business logic for the medrec record store.
//!
//! This crate contains pure data operations over the durable record
//! collection and its read-through cache:
//! - Record creation, lookup, update and deletion through [`RecordService`]
//! - Filtered, date-ordered listing of the collection
//! - Identity-keyed cache invalidation on every write
//!
//! **No API concerns**: HTTP servers, wire envelopes or CLI parsing belong in
//! `api-rest`, `api-shared` or `medrec-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod records;

pub use config::CoreConfig;
pub use error::{RecordError, RecordResult};
pub use filter::RecordFilter;
pub use records::{FetchedRecord, RecordService};
