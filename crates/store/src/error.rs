use chantier_core::error::CoreError;

/// Error type for store, repository and export operations.
///
/// Wraps [`CoreError`] for domain errors and adds persistence variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain-level error from `chantier_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused a write that would exceed its byte budget.
    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// QR or PDF rendering failed.
    #[error("Render error: {0}")]
    Render(String),
}

/// Convenience alias for store return values.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        StoreError::Core(CoreError::from(errors))
    }
}
