//! Turning input paths into file handles.
//!
//! Paths are checked up front so a missing file is reported before any
//! merging starts. Content is not read here; the orchestrator reads each
//! handle when it gets to it.

use std::path::{Path, PathBuf};

use crate::error::{PdfMergeError, Result};
use crate::selection::FileHandle;
use crate::utils::format_file_size;

/// A checked input path.
#[derive(Debug, Clone)]
pub struct OpenedInput {
    /// Handle for the orchestrator.
    pub handle: FileHandle,

    /// Path to the source file.
    pub path: PathBuf,

    /// File size in bytes.
    pub file_size: u64,
}

/// Summary of a batch of opened inputs.
#[derive(Debug, Clone, Default)]
pub struct InputStatistics {
    /// Number of inputs opened.
    pub files: usize,

    /// Number of inputs declared as PDF.
    pub pdf_files: usize,

    /// Total size of all inputs.
    pub total_size: u64,
}

impl InputStatistics {
    fn from_inputs(inputs: &[OpenedInput]) -> Self {
        Self {
            files: inputs.len(),
            pdf_files: inputs.iter().filter(|i| i.handle.is_pdf()).count(),
            total_size: inputs.iter().map(|i| i.file_size).sum(),
        }
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Check that `path` is an existing regular file and return its size.
///
/// # Errors
///
/// Returns [`PdfMergeError::FileNotFound`] or [`PdfMergeError::NotAFile`].
pub async fn check_input_path(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| PdfMergeError::file_not_found(path.to_path_buf()))?;

    if !metadata.is_file() {
        return Err(PdfMergeError::not_a_file(path.to_path_buf()));
    }

    Ok(metadata.len())
}

/// Open one input path.
pub async fn open_input(path: &Path) -> Result<OpenedInput> {
    let file_size = check_input_path(path).await?;
    Ok(OpenedInput {
        handle: FileHandle::from_path(path),
        path: path.to_path_buf(),
        file_size,
    })
}

/// Open every input path in order, stopping at the first bad one.
pub async fn open_inputs(paths: &[PathBuf]) -> Result<(Vec<OpenedInput>, InputStatistics)> {
    let mut inputs = Vec::with_capacity(paths.len());
    for path in paths {
        inputs.push(open_input(path).await?);
    }

    let stats = InputStatistics::from_inputs(&inputs);
    tracing::debug!(
        "Opened {} input(s), {} declared as PDF, {}",
        stats.files,
        stats.pdf_files,
        stats.format_total_size()
    );
    Ok((inputs, stats))
}
