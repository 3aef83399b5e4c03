use thiserror::Error;

/// Main error type for kinterm
#[derive(Error, Debug)]
pub enum KintermError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed request: bad relation type, self-relation, missing fields
    #[error("Validation error: {0}")]
    Validation(String),

    /// A relation already links the pair
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Person not present in the directory
    #[error("Person not found: {0}")]
    PersonNotFound(i64),
}

impl KintermError {
    /// Stable machine-readable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            KintermError::Database(_) => "database",
            KintermError::Io(_) => "io",
            KintermError::Config(_) => "config",
            KintermError::Validation(_) => "validation",
            KintermError::Conflict(_) => "conflict",
            KintermError::PersonNotFound(_) => "not_found",
        }
    }

    /// True for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            KintermError::Validation(_) | KintermError::Conflict(_) | KintermError::PersonNotFound(_)
        )
    }
}

/// Convenient Result type using KintermError
pub type Result<T> = std::result::Result<T, KintermError>;
