//! Operation status and the events that drive it.
//!
//! The orchestrator publishes a [`StatusEvent`] for every state change. Each
//! event implies an [`OperationStatus`] and carries a message fit for
//! display, so presentation layers need no knowledge of merge internals.

use serde::Serialize;

use crate::download::DownloadRef;

/// Prefix of the failure message shown to the user.
const FAILURE_PREFIX: &str = "An error occurred while merging the PDFs";

/// Suffix of the failure message shown to the user.
const FAILURE_HINT: &str = "Make sure the files are not corrupted or protected.";

/// Build the user-facing failure reason around an underlying message.
pub fn failure_reason(message: &str) -> String {
    format!("{FAILURE_PREFIX}: {message}. {FAILURE_HINT}")
}

/// State of the merge orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OperationStatus {
    /// Nothing running.
    #[default]
    Idle,
    /// A merge is in progress.
    Running,
    /// The last merge produced a download.
    Succeeded,
    /// The last merge failed.
    Failed {
        /// User-facing failure reason.
        reason: String,
    },
}

/// An observable change in the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StatusEvent {
    /// A new selection replaced the previous one.
    Selected {
        /// Files kept.
        retained: usize,
        /// Files dropped for not being PDFs.
        dropped: usize,
    },
    /// A merge started.
    Started {
        /// Files about to be merged.
        files: usize,
    },
    /// All pages of one file were appended to the output.
    FileMerged {
        /// One-based position of the file in the selection.
        index: usize,
        /// Number of files in the selection.
        total: usize,
        /// File name.
        name: String,
        /// Pages appended from this file.
        pages: usize,
    },
    /// The merge produced a download.
    Succeeded {
        /// Reference to the merged bytes.
        download: DownloadRef,
        /// Total pages in the output.
        pages: usize,
    },
    /// The merge failed.
    Failed {
        /// User-facing failure reason.
        reason: String,
    },
    /// The selection and any result were cleared.
    Cleared,
}

impl StatusEvent {
    /// The status this event puts the orchestrator in.
    pub fn status(&self) -> OperationStatus {
        match self {
            Self::Selected { .. } | Self::Cleared => OperationStatus::Idle,
            Self::Started { .. } | Self::FileMerged { .. } => OperationStatus::Running,
            Self::Succeeded { .. } => OperationStatus::Succeeded,
            Self::Failed { reason } => OperationStatus::Failed {
                reason: reason.clone(),
            },
        }
    }

    /// Human-readable description.
    pub fn message(&self) -> String {
        match self {
            Self::Selected { retained, dropped } => {
                if *dropped == 0 {
                    format!("Selected {retained} PDF file(s)")
                } else {
                    format!("Selected {retained} PDF file(s), ignored {dropped} other file(s)")
                }
            }
            Self::Started { files } => format!("Merging {files} file(s)..."),
            Self::FileMerged {
                index,
                total,
                name,
                pages,
            } => format!("[{index}/{total}] {name} ({pages} page(s))"),
            Self::Succeeded { download, pages } => {
                format!("Merged PDF ready: {} ({pages} page(s))", download.filename())
            }
            Self::Failed { reason } => reason.clone(),
            Self::Cleared => "Selection cleared".to_string(),
        }
    }
}
