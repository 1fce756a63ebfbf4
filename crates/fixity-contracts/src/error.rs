//! Error types for the fixity repository layer.
//!
//! Only infrastructure problems are errors. A failed checksum audit is data
//! (a stored entry with `pass = false`) and a not-yet-due audit is `Ok(None)`,
//! so neither appears here.

use thiserror::Error;

/// The unified error type for the repository-object layer.
#[derive(Debug, Error)]
pub enum FixityError {
    /// The referenced repository object does not exist.
    #[error("object '{object_id}' not found")]
    ObjectNotFound { object_id: String },

    /// The content or metadata store could not be reached or read.
    #[error("store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// The audit log could not persist or remove an entry.
    #[error("audit log write failed: {reason}")]
    AuditLogWriteFailed { reason: String },

    /// A caller asked the audit log to delete a failing entry.
    ///
    /// Failing entries are forensic history and are never removed.
    #[error("audit log entry {entry_id} records a failure and cannot be deleted")]
    ProtectedEntry { entry_id: u64 },

    /// The characterization tool could not process the object's content.
    #[error("characterization of '{object_id}' failed: {reason}")]
    ExtractionFailed { object_id: String, reason: String },

    /// The job queue rejected or lost a job.
    #[error("job queue error: {reason}")]
    JobQueueError { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Raw characterization output did not match the expected shape.
    #[error("schema validation error: {reason}")]
    SchemaValidation { reason: String },
}

/// Convenience alias used throughout the fixity crates.
pub type FixityResult<T> = Result<T, FixityError>;
