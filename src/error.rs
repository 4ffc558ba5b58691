//! Error types for the syncstore library
//!
//! This module provides a unified error handling system using `thiserror` for
//! all components of the adapter.

use thiserror::Error;

/// The main error type for the syncstore library
///
/// Errors are `Clone` because the outcome of the one-time prepare read is
/// fanned out to every caller through a shared future.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Storage operation errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors raised by the downstream stage of the pipeline
    #[error("Pipeline error: {message}")]
    Pipeline {
        /// Description of the pipeline failure
        message: String,
    },

    /// Other errors
    #[error("Other error: {message}")]
    Other {
        /// Description of the error
        message: String,
    },
}

/// Storage-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend exposes neither the bulk-async nor the indexed-sync
    /// capability set
    #[error("Unsupported storage format")]
    UnsupportedFormat,

    /// A backend operation failed
    #[error("Storage operation failed: {operation}: {reason}")]
    OperationFailed {
        /// The name of the operation that failed
        operation: String,
        /// The reason the operation failed
        reason: String,
    },
}

impl StorageError {
    /// Shorthand for [`StorageError::OperationFailed`]
    pub fn operation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for Storage Results
pub type StorageResult<T> = std::result::Result<T, StorageError>;
