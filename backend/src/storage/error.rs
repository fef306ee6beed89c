use thiserror::Error;

/// Failures raised by a store. The display text is what gets shown to the
/// person using the dashboard.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Backend connection error: {0}")]
    Connection(String),
    #[error("Backend request failed: {0}")]
    Query(String),
    #[error("{0} not found")]
    NotFound(String),
}
