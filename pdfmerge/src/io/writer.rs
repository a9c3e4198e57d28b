//! Writing merged blobs to disk.
//!
//! This module provides safe output writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Overwrite checks
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::BlobWriter;
//! use std::path::Path;
//!
//! # async fn example(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = BlobWriter::new();
//! writer.write(bytes, Path::new("merged.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{PdfMergeError, Result};
use crate::utils::format_file_size;

/// Options for writing output files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes blobs to files.
#[derive(Debug, Clone, Default)]
pub struct BlobWriter {
    options: WriteOptions,
}

impl BlobWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Write `bytes` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::FailedToWrite`] if the file cannot be
    /// created, written or renamed into place.
    pub async fn write(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        self.write_shared(Arc::from(bytes), path).await
    }

    /// Write a shared blob to `path` without copying it first.
    pub async fn write_shared(&self, bytes: Arc<[u8]>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if options.atomic {
                temp_path(&path_buf)
            } else {
                path_buf.clone()
            };

            let failed = |source| PdfMergeError::FailedToWrite {
                path: write_path.clone(),
                source,
            };

            let file = std::fs::File::create(&write_path).map_err(failed)?;
            let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);
            writer.write_all(&bytes).map_err(failed)?;
            writer.flush().map_err(failed)?;
            drop(writer);

            if options.atomic {
                std::fs::rename(&write_path, &path_buf).map_err(|e| {
                    let _ = std::fs::remove_file(&write_path);
                    PdfMergeError::FailedToWrite {
                        path: path_buf.clone(),
                        source: e,
                    }
                })?;
            }

            let file_size = std::fs::metadata(&path_buf)
                .map(|m| m.len())
                .unwrap_or(bytes.len() as u64);

            Ok(WriteStatistics {
                write_time: start.elapsed(),
                file_size,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| PdfMergeError::other(format!("Write task failed: {e}")))?
    }

    /// Check if a file can be written to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory doesn't exist or is not
    /// writable.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };

        let metadata = tokio::fs::metadata(parent).await.map_err(|_| {
            PdfMergeError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            ))
        })?;

        if !metadata.is_dir() {
            return Err(PdfMergeError::invalid_config(format!(
                "Output directory is not a directory: {}",
                parent.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(PdfMergeError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

/// Sibling temp path used for atomic writes.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
