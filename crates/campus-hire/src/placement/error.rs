use super::store::RepositoryError;
use super::validation::ValidationError;

/// Error raised by the placement services.
#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    /// A referenced id did not resolve to a stored record.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    /// A uniqueness rule rejected the write.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    /// Rendering an export failed on our side, not because of caller input.
    #[error("failed to render CSV export: {0}")]
    Export(#[source] csv::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl PlacementError {
    pub(crate) fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Translate a store error so unique-key collisions surface as the business conflict.
    pub(crate) fn from_store(err: RepositoryError, entity: &'static str, conflict: &str) -> Self {
        match err {
            RepositoryError::Conflict => Self::Conflict(conflict.to_string()),
            RepositoryError::NotFound => Self::not_found(entity),
            other => Self::Repository(other),
        }
    }
}
