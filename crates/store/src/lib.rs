//! Key-value persistence and cache backends for medrec.
//!
//! This crate defines the two storage seams the record service depends on:
//!
//! - [`BlobStore`]: durable get/set of string blobs by key. The record
//!   collection lives here as a single blob, replaced wholesale on every
//!   write.
//! - [`Cache`]: opportunistic get / set-with-expiry / delete. Strictly an
//!   optimisation, so callers must treat every cache failure as non-fatal.
//!
//! # Implementations
//!
//! [`FileStore`] persists one file per key beneath a data directory and is
//! what the server and CLI run against. [`MemoryStore`] and [`MemoryCache`]
//! back tests and ephemeral runs.
//!
//! # Key validation
//!
//! `FileStore` keys become file names, so keys are validated eagerly: they
//! must be non-empty and must not contain path separators or traversal
//! segments. Cache keys carry `:`-separated prefixes (`record:`,
//! `invalidation:`) and are never used as paths.

mod blob;
mod cache;
mod error;

pub use blob::{BlobStore, FileStore, MemoryStore};
pub use cache::{Cache, MemoryCache};
pub use error::{CacheError, StoreError};
