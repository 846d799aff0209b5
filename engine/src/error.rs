//! Error types for the duplicator engine.
//!
//! `EngineError` represents run-level failures that stop the duplicator.
//! A failed copy of a single plan entry is not an `EngineError` result of the
//! run; it is recorded as an [`EntryOutcome::Failed`](crate::model::EntryOutcome)
//! and the run continues.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop a duplication run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// None of the configured source names resolved to a file under the root
    #[error("No valid source files found in {}", root.display())]
    NoValidSources { root: PathBuf },

    /// The configuration file could not be read or parsed
    #[error("Failed to load configuration {}: {reason}", path.display())]
    ConfigLoad { path: PathBuf, reason: String },

    /// The destination directory could not be created
    #[error("Failed to create directory: {}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The mapping file could not be created
    #[error("Failed to open mapping file: {}", path.display())]
    MappingOpenFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row could not be written to the mapping file, or it could not be flushed
    #[error("Failed to write mapping file: {}", path.display())]
    MappingWriteFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to read from a source file
    #[error("Failed to read file: {}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write to a destination file
    #[error("Failed to write file: {}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl EngineError {
    /// Process exit status for this error.
    ///
    /// Input errors (nothing to copy from, unusable configuration) map to 1,
    /// fatal I/O at the destination maps to 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoValidSources { .. } | Self::ConfigLoad { .. } => 1,
            Self::DirectoryCreationFailed { .. }
            | Self::MappingOpenFailed { .. }
            | Self::MappingWriteFailed { .. }
            | Self::ReadError { .. }
            | Self::WriteError { .. } => 2,
        }
    }

    /// Human-readable message including the underlying cause, if any.
    pub fn detailed_message(&self) -> String {
        match std::error::Error::source(self) {
            Some(cause) => format!("{}: {}", self, cause),
            None => self.to_string(),
        }
    }
}
