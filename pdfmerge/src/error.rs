//! Error types for pdfmerge.
//!
//! Every failure the orchestrator, the capability adapter or the CLI can
//! produce is a [`PdfMergeError`]. Merge failures are tagged by the stage
//! that failed so callers can tell a corrupt input apart from a broken
//! serialization step.
//!
//! # Error Categories
//!
//! - **Selection Errors**: nothing eligible to merge
//! - **Input Errors**: missing files, unreadable content
//! - **Capability Errors**: parse, copy and serialize failures
//! - **Output Errors**: revoked download references, overwrite refusals,
//!   write failures

use std::io;
use std::path::PathBuf;

use crate::capability::CapabilityError;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, PdfMergeError>;

/// Main error type for pdfmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfMergeError {
    /// Merge or plan was requested with no eligible files selected.
    #[error("Please select at least one PDF file to merge")]
    EmptySelection,

    /// Input path was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// The content of a selected file could not be read.
    #[error("Failed to read {name}: {source}")]
    ReadFailure {
        /// Name of the selected file.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A selected file could not be interpreted as a PDF.
    #[error("Failed to load PDF {name}: {reason}")]
    ParseFailure {
        /// Name of the selected file.
        name: String,
        /// Message reported by the PDF capability.
        reason: String,
    },

    /// Copying or appending the pages of a file failed.
    #[error("Failed to copy pages from {name}: {reason}")]
    CopyFailure {
        /// Name of the selected file.
        name: String,
        /// Message reported by the PDF capability.
        reason: String,
    },

    /// Serializing the merged document failed.
    #[error("Failed to serialize merged PDF: {reason}")]
    SerializeFailure {
        /// Message reported by the PDF capability.
        reason: String,
    },

    /// Any other capability failure during a merge.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// A download reference was used after it had been revoked.
    #[error("Download reference is no longer valid: {url}")]
    ReferenceRevoked {
        /// URL of the revoked reference.
        url: String,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for PdfMergeError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl PdfMergeError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create a ReadFailure error for the named file.
    pub fn read_failure(name: impl Into<String>, source: io::Error) -> Self {
        Self::ReadFailure {
            name: name.into(),
            source,
        }
    }

    /// Create a ParseFailure error from a capability error.
    pub fn parse_failure(name: impl Into<String>, err: CapabilityError) -> Self {
        Self::ParseFailure {
            name: name.into(),
            reason: err.to_string(),
        }
    }

    /// Create a CopyFailure error from a capability error.
    pub fn copy_failure(name: impl Into<String>, err: CapabilityError) -> Self {
        Self::CopyFailure {
            name: name.into(),
            reason: err.to_string(),
        }
    }

    /// Create a SerializeFailure error from a capability error.
    pub fn serialize_failure(err: CapabilityError) -> Self {
        Self::SerializeFailure {
            reason: err.to_string(),
        }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error aborted a merge attempt.
    ///
    /// These are the failures that move the orchestrator into the failed
    /// state. `EmptySelection` is not one of them: it is rejected before the
    /// merge starts.
    pub fn is_merge_failure(&self) -> bool {
        matches!(
            self,
            Self::ReadFailure { .. }
                | Self::ParseFailure { .. }
                | Self::CopyFailure { .. }
                | Self::SerializeFailure { .. }
                | Self::MergeFailed { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptySelection => 1,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::ReadFailure { .. } => 2,
            Self::ParseFailure { .. } => 3,
            Self::CopyFailure { .. } => 6,
            Self::SerializeFailure { .. } => 6,
            Self::MergeFailed { .. } => 6,
            Self::ReferenceRevoked { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
