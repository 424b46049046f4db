//! Data-source error types.

use thiserror::Error;

/// Failures raised by the PostgreSQL data source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("failed to decode {entity} row")]
    Decode {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias using SourceError.
pub type SourceResult<T> = Result<T, SourceError>;
