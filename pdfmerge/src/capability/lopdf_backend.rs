//! [`PdfCapability`] implemented on top of `lopdf`.

use async_trait::async_trait;
use chrono::Utc;
use lopdf::{Document, Object, ObjectId};
use tokio::task;

use super::metadata::DocumentInfo;
use super::page_tree;
use super::{
    CapabilityError, CapabilityResult, CompressionLevel, LoadOptions, PdfCapability, SaveOptions,
};

/// PDF version written by documents this capability creates.
const OUTPUT_VERSION: &str = "1.7";

/// A page imported into a target document, waiting to be appended to its
/// page tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopiedPage(ObjectId);

impl CopiedPage {
    /// Object id of the page inside the target document.
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

/// Production PDF capability backed by `lopdf`.
///
/// Parsing and serialization run on tokio's blocking pool.
#[derive(Debug, Clone, Default)]
pub struct LopdfCapability {
    info: DocumentInfo,
}

impl LopdfCapability {
    /// Create a capability stamping the default producer and creator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a capability stamping custom document info.
    pub fn with_info(info: DocumentInfo) -> Self {
        Self { info }
    }
}

#[async_trait(?Send)]
impl PdfCapability for LopdfCapability {
    type Document = Document;
    type Page = CopiedPage;

    async fn create(&self) -> CapabilityResult<Document> {
        let mut doc = page_tree::empty_document(OUTPUT_VERSION);
        self.info.stamp(&mut doc, Utc::now());
        Ok(doc)
    }

    async fn load(&self, bytes: Vec<u8>, options: LoadOptions) -> CapabilityResult<Document> {
        let mut doc = task::spawn_blocking(move || Document::load_mem(&bytes))
            .await
            .map_err(|e| CapabilityError::load(format!("Task join error: {e}")))?
            .map_err(|e| CapabilityError::load(e.to_string()))?;

        reject_locked(&doc)?;
        apply_encryption_policy(&mut doc, options)?;
        ensure_page_tree(&doc)?;
        Ok(doc)
    }

    fn page_indices(&self, doc: &Document) -> Vec<usize> {
        (0..doc.get_pages().len()).collect()
    }

    async fn copy_pages(
        &self,
        target: &mut Document,
        source: &Document,
        indices: &[usize],
    ) -> CapabilityResult<Vec<CopiedPage>> {
        // Work on a renumbered clone so source ids never collide with ids
        // already present in the target.
        let mut staged = source.clone();
        staged.renumber_objects_with(target.max_id + 1);

        let page_ids: Vec<ObjectId> = staged.get_pages().into_values().collect();

        let mut copied = Vec::with_capacity(indices.len());
        for &index in indices {
            let page_id = page_ids.get(index).copied().ok_or_else(|| {
                CapabilityError::copy(format!(
                    "Page index {index} is out of range (document has {} pages)",
                    page_ids.len()
                ))
            })?;
            copied.push(CopiedPage(page_tree::import_page(
                target, &staged, page_id,
            )?));
        }

        target.max_id = target.max_id.max(staged.max_id);
        Ok(copied)
    }

    fn add_page(&self, target: &mut Document, page: CopiedPage) -> CapabilityResult<()> {
        page_tree::append_page(target, page.0)
    }

    async fn save(&self, doc: Document, options: SaveOptions) -> CapabilityResult<Vec<u8>> {
        task::spawn_blocking(move || {
            let mut doc = doc;

            match options.compression {
                CompressionLevel::None => {}
                CompressionLevel::Standard => doc.compress(),
                CompressionLevel::Maximum => {
                    doc.prune_objects();
                    doc.compress();
                }
            }
            doc.renumber_objects();

            let mut buffer = Vec::new();
            doc.save_to(&mut buffer)
                .map_err(|e| CapabilityError::save(e.to_string()))?;
            Ok(buffer)
        })
        .await
        .map_err(|e| CapabilityError::save(format!("Task join error: {e}")))?
    }
}

/// Fail on documents lopdf could not decrypt.
///
/// Without the password lopdf returns the document with its objects left
/// unparsed, which would otherwise look like a document with no pages.
fn reject_locked(doc: &Document) -> CapabilityResult<()> {
    if doc.trailer.has(b"Encrypt") && doc.encryption_state.is_none() {
        return Err(CapabilityError::load(
            "document is encrypted and requires a password",
        ));
    }
    Ok(())
}

/// Require a catalog whose `/Pages` resolves to a dictionary.
fn ensure_page_tree(doc: &Document) -> CapabilityResult<()> {
    let catalog = doc
        .catalog()
        .map_err(|e| CapabilityError::load(format!("document catalog is missing: {e}")))?;

    catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .map_err(|e| CapabilityError::load(format!("document page tree is missing: {e}")))?;
    Ok(())
}

/// Enforce the encryption tolerance setting on a freshly loaded document.
///
/// With tolerance on, the trailer's `/Encrypt` entry is dropped so it is not
/// carried into derived output. With tolerance off, a document that still
/// carries the entry is rejected.
fn apply_encryption_policy(doc: &mut Document, options: LoadOptions) -> CapabilityResult<()> {
    if !doc.trailer.has(b"Encrypt") {
        return Ok(());
    }

    if options.ignore_encryption {
        tracing::debug!("Ignoring encryption entry in document trailer");
        doc.trailer.remove(b"Encrypt");
        Ok(())
    } else {
        Err(CapabilityError::Encrypted)
    }
}
