//! Revocable references to merged blobs.
//!
//! A [`DownloadRef`] is the handle a presentation layer gets after a merge:
//! it points at bytes held by the [`DownloadStore`] until revoked. Once
//! revoked the bytes are released and the reference resolves to nothing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{PdfMergeError, Result};

/// Default suggested file name for merged output.
pub const DEFAULT_FILENAME: &str = "merged.pdf";

/// Handle to a blob in a [`DownloadStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DownloadRef {
    id: Uuid,
    filename: String,
    url: String,
}

impl DownloadRef {
    fn new(filename: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            filename: filename.into(),
            url: format!("blob:{}/{id}", crate::NAME),
        }
    }

    /// Unique id of the blob.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Suggested file name for saving the blob.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Opaque URL identifying the blob.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for DownloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.filename)
    }
}

/// In-memory owner of merged blobs.
#[derive(Debug, Default)]
pub struct DownloadStore {
    blobs: HashMap<Uuid, Arc<[u8]>>,
}

impl DownloadStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `bytes` and return a fresh reference to them.
    pub fn register(&mut self, bytes: Vec<u8>, filename: impl Into<String>) -> DownloadRef {
        let reference = DownloadRef::new(filename);
        self.blobs.insert(reference.id, Arc::from(bytes));
        tracing::debug!("Registered download {}", reference.url);
        reference
    }

    /// Bytes behind a live reference.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::ReferenceRevoked`] if the reference was
    /// revoked or never belonged to this store.
    pub fn resolve(&self, reference: &DownloadRef) -> Result<Arc<[u8]>> {
        self.blobs
            .get(&reference.id)
            .cloned()
            .ok_or_else(|| PdfMergeError::ReferenceRevoked {
                url: reference.url.clone(),
            })
    }

    /// Release the bytes behind a reference.
    ///
    /// Returns `false` if it was already revoked.
    pub fn revoke(&mut self, reference: &DownloadRef) -> bool {
        let removed = self.blobs.remove(&reference.id).is_some();
        if removed {
            tracing::debug!("Revoked download {}", reference.url);
        }
        removed
    }

    /// Whether the reference is still live.
    pub fn contains(&self, reference: &DownloadRef) -> bool {
        self.blobs.contains_key(&reference.id)
    }

    /// Number of live blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}
