/// Errors surfaced by record operations.
///
/// `MissingFields`, `NotFound` and `DuplicateId` are caller errors with
/// stable messages; the remaining variants mean the durable store could not
/// be read or written. Cache failures never appear here: the cache is an
/// optimisation and its errors are logged and swallowed at the call site.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("medical record not found: {0}")]
    NotFound(String),
    #[error("a medical record with id {0} already exists")]
    DuplicateId(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to serialize record collection: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record collection: {0}")]
    Deserialization(serde_json::Error),
    #[error("persistence error: {0}")]
    Store(#[from] medrec_store::StoreError),
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
