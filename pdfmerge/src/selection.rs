//! User-supplied file handles and the ordered selection built from them.
//!
//! A [`FileHandle`] is what a file picker hands over: a name, a declared
//! content type and a way to get at the bytes. The declared type is taken at
//! face value; content is never sniffed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{PdfMergeError, Result};

/// Declared content type of files eligible for merging.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Where the bytes of a [`FileHandle`] live.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// Bytes already in memory.
    Memory(Arc<[u8]>),
    /// A file on disk, read when the merge needs it.
    Disk(PathBuf),
}

/// A user-supplied file: name, declared type and content.
#[derive(Debug, Clone)]
pub struct FileHandle {
    name: String,
    mime_type: String,
    content: FileContent,
}

impl FileHandle {
    /// Create a handle over in-memory bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: FileContent::Memory(bytes.into()),
        }
    }

    /// Create a handle over a file on disk.
    ///
    /// The declared type is guessed from the extension, and is empty when the
    /// extension is unknown.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("")
            .to_string();

        Self {
            name,
            mime_type,
            content: FileContent::Disk(path.to_path_buf()),
        }
    }

    /// Override the declared type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// File name shown to the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared content type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Where the content lives.
    pub fn content(&self) -> &FileContent {
        &self.content
    }

    /// Whether the declared type makes this handle eligible for merging.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == PDF_MIME_TYPE
    }

    /// Read the full content.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::ReadFailure`] if the file on disk cannot be
    /// read.
    pub async fn read(&self) -> Result<Vec<u8>> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(bytes.to_vec()),
            FileContent::Disk(path) => tokio::fs::read(path)
                .await
                .map_err(|e| PdfMergeError::read_failure(&self.name, e)),
        }
    }
}

/// Summary of one selected file, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    /// File name.
    pub name: String,
    /// Declared content type.
    pub mime_type: String,
}

/// Ordered set of files eligible for merging.
///
/// Insertion order is merge order. Handles whose declared type is not
/// exactly [`PDF_MIME_TYPE`] never enter the set.
#[derive(Debug, Clone, Default)]
pub struct SelectedFileSet {
    files: Vec<FileHandle>,
}

impl SelectedFileSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from handles, dropping non-PDF ones.
    ///
    /// Returns the selection and the number of handles dropped.
    pub fn filter(handles: impl IntoIterator<Item = FileHandle>) -> (Self, usize) {
        let mut files = Vec::new();
        let mut dropped = 0;

        for handle in handles {
            if handle.is_pdf() {
                files.push(handle);
            } else {
                tracing::debug!(
                    "Dropping {} (declared type {:?})",
                    handle.name(),
                    handle.mime_type()
                );
                dropped += 1;
            }
        }

        (Self { files }, dropped)
    }

    /// Number of selected files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate over the selected handles in merge order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileHandle> {
        self.files.iter()
    }

    /// Names of the selected files in merge order.
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(FileHandle::name).collect()
    }

    /// Summaries of the selected files in merge order.
    pub fn summaries(&self) -> Vec<SelectedFile> {
        self.files
            .iter()
            .map(|f| SelectedFile {
                name: f.name.clone(),
                mime_type: f.mime_type.clone(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a SelectedFileSet {
    type Item = &'a FileHandle;
    type IntoIter = std::slice::Iter<'a, FileHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
