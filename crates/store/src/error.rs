/// Errors from the durable blob store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store key: {0}")]
    InvalidKey(String),
    #[error("invalid data directory: {0}")]
    InvalidDataDir(String),
    #[error("failed to create data directory: {0}")]
    DataDirCreation(std::io::Error),
    #[error("failed to read blob: {0}")]
    Read(std::io::Error),
    #[error("failed to write blob: {0}")]
    Write(std::io::Error),
}

/// Errors from the cache.
///
/// Callers treat these as non-fatal: the cache is an optimisation, never a
/// correctness dependency.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid cache key: {0}")]
    InvalidKey(String),
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}
