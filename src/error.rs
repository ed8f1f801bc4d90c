//! Error types for the ledger library.
//!
//! The filter and aggregation engine absorbs malformed input and never
//! fails; errors only arise at the edges (reading or writing snapshots and
//! validating new entries).

/// All errors that can occur when using the ledger library.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing a snapshot file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot location could not be determined.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// A new transaction failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidDraft {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, LedgerError>;
