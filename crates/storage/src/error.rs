use domain::DomainError;
use thiserror::Error;

/// Errors that can occur when interacting with a repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The entity to update does not exist.
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row violates a domain invariant.
    #[error("Corrupt record: {0}")]
    Domain(#[from] DomainError),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;
