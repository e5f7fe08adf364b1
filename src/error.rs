//! Error types shared across the data layer.

use thiserror::Error;
use uuid::Uuid;

/// Failures of the durable meal store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Meal not found: {0}")]
    NotFound(Uuid),

    #[error("Corrupt row in '{table}': {reason}")]
    CorruptRow { table: &'static str, reason: String },
}

/// Malformed editor input. Rejected before anything reaches the store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid item '{0}'. Use NAME:AMOUNT or NAME:AMOUNT:CARBS:PROTEIN:CALORIES")]
    MalformedItem(String),

    #[error("No template named '{0}'")]
    UnknownTemplate(String),
}

/// A reference-dataset row that was skipped during ingestion.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{origin}:{line}: {reason}")]
pub struct IngestionWarning {
    pub origin: String,
    pub line: usize,
    pub reason: String,
}

/// A background sync check that did not complete.
#[derive(Error, Debug)]
pub enum SyncCheckFailure {
    #[error("Sync monitor has not been started")]
    NotStarted,

    #[error("Sync check read failed: {0}")]
    Read(#[from] StoreError),
}

/// Failures talking to the remote nutrition database.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(reqwest::StatusCode),
}
