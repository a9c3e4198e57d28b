//! The PDF manipulation capability the orchestrator drives.
//!
//! The orchestrator never touches PDF structure itself. It talks to a
//! [`PdfCapability`], which creates documents, loads them from bytes, copies
//! pages between them and serializes the result. [`LopdfCapability`] is the
//! production implementation; tests substitute fakes that fail on demand.

mod lopdf_backend;
mod metadata;
mod page_tree;

pub use lopdf_backend::{CopiedPage, LopdfCapability};
pub use metadata::DocumentInfo;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::PdfMergeError;

/// Result type for capability operations.
pub type CapabilityResult<T> = std::result::Result<T, CapabilityError>;

/// Failure reported by a [`PdfCapability`].
///
/// The orchestrator wraps these into the stage-specific
/// [`PdfMergeError`] variants, keeping the message intact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityError {
    /// The document could not be created.
    #[error("failed to create document: {0}")]
    Create(String),
    /// The bytes could not be parsed as a document.
    #[error("{0}")]
    Load(String),
    /// The document carries encryption metadata and tolerance is off.
    #[error("document is encrypted")]
    Encrypted,
    /// Page copy or append failed.
    #[error("{0}")]
    Copy(String),
    /// Serialization failed.
    #[error("{0}")]
    Save(String),
}

impl CapabilityError {
    /// Create a Load error.
    pub fn load(message: impl Into<String>) -> Self {
        Self::Load(message.into())
    }

    /// Create a Copy error.
    pub fn copy(message: impl Into<String>) -> Self {
        Self::Copy(message.into())
    }

    /// Create a Save error.
    pub fn save(message: impl Into<String>) -> Self {
        Self::Save(message.into())
    }
}

/// Options applied when loading a document from bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadOptions {
    /// Load documents whose trailer carries encryption metadata instead of
    /// rejecting them. The encryption entry is not enforced.
    pub ignore_encryption: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            ignore_encryption: true,
        }
    }
}

/// Compression level for the serialized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Write streams as they are.
    None,
    /// Compress uncompressed streams.
    #[default]
    Standard,
    /// Drop unreachable objects, then compress.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfMergeError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfMergeError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Options applied when serializing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOptions {
    /// Compression applied before writing.
    pub compression: CompressionLevel,
}

/// A PDF manipulation backend.
///
/// Methods that parse or serialize are async so an implementation can move
/// the work off the calling task. Futures are not required to be `Send`: the
/// orchestrator runs a merge as a single sequential task.
#[async_trait(?Send)]
pub trait PdfCapability {
    /// In-memory document context.
    type Document;

    /// A page copied into a target document but not yet attached to its
    /// page tree.
    type Page;

    /// Create an empty document.
    async fn create(&self) -> CapabilityResult<Self::Document>;

    /// Parse a document from its serialized bytes.
    async fn load(&self, bytes: Vec<u8>, options: LoadOptions) -> CapabilityResult<Self::Document>;

    /// Zero-based indices of every page, in document order.
    fn page_indices(&self, doc: &Self::Document) -> Vec<usize>;

    /// Copy the pages at `indices` from `source` into `target`.
    ///
    /// The returned pages are owned by `target` but detached; they appear in
    /// the output only once passed to [`PdfCapability::add_page`].
    async fn copy_pages(
        &self,
        target: &mut Self::Document,
        source: &Self::Document,
        indices: &[usize],
    ) -> CapabilityResult<Vec<Self::Page>>;

    /// Append a copied page to the end of `target`'s page tree.
    fn add_page(&self, target: &mut Self::Document, page: Self::Page) -> CapabilityResult<()>;

    /// Serialize a document to bytes.
    async fn save(&self, doc: Self::Document, options: SaveOptions) -> CapabilityResult<Vec<u8>>;
}
