//! The merge orchestrator.
//!
//! [`MergeOrchestrator`] owns the current selection, the operation status and
//! the download store. It drives a [`PdfCapability`] through a merge and
//! publishes a [`StatusEvent`] for every state change.
//!
//! `select`, `merge` and `clear` take `&mut self`: while a merge future is
//! alive nothing else can touch the orchestrator, so at most one merge runs
//! at a time and the selection cannot change underneath it.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::capability::{LoadOptions, PdfCapability, SaveOptions};
use crate::download::{DEFAULT_FILENAME, DownloadRef, DownloadStore};
use crate::error::{PdfMergeError, Result};
use crate::selection::{FileHandle, SelectedFileSet};
use crate::status::{OperationStatus, StatusEvent, failure_reason};

/// Capacity of the status event channel.
const EVENT_CAPACITY: usize = 64;

/// Options applied to every merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Options passed to the capability when loading each input.
    pub load: LoadOptions,
    /// Options passed to the capability when serializing the output.
    pub save: SaveOptions,
    /// Suggested file name attached to the download reference.
    pub filename: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            save: SaveOptions::default(),
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeResult {
    /// Reference to the merged bytes.
    pub download: DownloadRef,
    /// Number of files merged.
    pub files: usize,
    /// Total pages in the output.
    pub pages: usize,
    /// Size of the output in bytes.
    pub bytes: usize,
}

/// Page count of one selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFile {
    /// File name.
    pub name: String,
    /// Number of pages the file would contribute.
    pub pages: usize,
}

/// What a merge of the current selection would produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergePlan {
    /// Files in merge order.
    pub files: Vec<PlannedFile>,
    /// Total pages in the output.
    pub total_pages: usize,
}

/// Coordinates selection, merging and download of PDF files.
pub struct MergeOrchestrator<C: PdfCapability> {
    capability: C,
    options: MergeOptions,
    selection: SelectedFileSet,
    status: OperationStatus,
    result: Option<MergeResult>,
    store: DownloadStore,
    events: broadcast::Sender<StatusEvent>,
}

impl<C: PdfCapability> MergeOrchestrator<C> {
    /// Create an idle orchestrator with an empty selection.
    pub fn new(capability: C, options: MergeOptions) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            capability,
            options,
            selection: SelectedFileSet::new(),
            status: OperationStatus::Idle,
            result: None,
            store: DownloadStore::new(),
            events,
        }
    }

    /// Subscribe to status events.
    ///
    /// Only events published after the call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.events.subscribe()
    }

    /// Current status.
    pub fn status(&self) -> &OperationStatus {
        &self.status
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectedFileSet {
        &self.selection
    }

    /// Result of the last successful merge, if still valid.
    pub fn result(&self) -> Option<&MergeResult> {
        self.result.as_ref()
    }

    /// Options applied to every merge.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Replace the selection with the PDF handles among `handles`.
    ///
    /// Non-PDF handles are dropped silently. Any previous result is
    /// discarded and its download revoked. Returns the number of handles
    /// kept.
    pub fn select(&mut self, handles: impl IntoIterator<Item = FileHandle>) -> usize {
        let (selection, dropped) = SelectedFileSet::filter(handles);
        let retained = selection.len();

        self.discard_result();
        self.selection = selection;

        tracing::info!("Selected {retained} PDF file(s), dropped {dropped}");
        self.transition(StatusEvent::Selected { retained, dropped });
        retained
    }

    /// Merge the selected files into one PDF.
    ///
    /// On success the merged bytes are registered in the download store and
    /// the status becomes [`OperationStatus::Succeeded`]. On failure the
    /// status becomes [`OperationStatus::Failed`]; the selection is kept and
    /// no result is stored.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::EmptySelection`] if nothing is selected; the status
    ///   is left untouched.
    /// - [`PdfMergeError::ReadFailure`], [`PdfMergeError::ParseFailure`],
    ///   [`PdfMergeError::CopyFailure`], [`PdfMergeError::SerializeFailure`]
    ///   or [`PdfMergeError::MergeFailed`] for the stage that failed.
    pub async fn merge(&mut self) -> Result<MergeResult> {
        if self.selection.is_empty() {
            return Err(PdfMergeError::EmptySelection);
        }

        self.discard_result();
        let files = self.selection.len();
        tracing::info!("Merging {files} file(s)");
        self.transition(StatusEvent::Started { files });

        match self.combine().await {
            Ok((bytes, pages)) => {
                let size = bytes.len();
                let download = self.store.register(bytes, self.options.filename.clone());
                let result = MergeResult {
                    download: download.clone(),
                    files,
                    pages,
                    bytes: size,
                };
                self.result = Some(result.clone());

                tracing::info!("Merged {files} file(s) into {pages} page(s), {size} bytes");
                self.transition(StatusEvent::Succeeded { download, pages });
                Ok(result)
            }
            Err(err) => {
                tracing::warn!("Merge failed: {err}");
                self.transition(StatusEvent::Failed {
                    reason: failure_reason(&err.to_string()),
                });
                Err(err)
            }
        }
    }

    /// Parse every selected file and report page counts, without producing
    /// output or changing the status.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::EmptySelection`] if nothing is selected, or
    /// the read or parse failure of the first file that cannot be loaded.
    pub async fn plan(&self) -> Result<MergePlan> {
        if self.selection.is_empty() {
            return Err(PdfMergeError::EmptySelection);
        }

        let mut files = Vec::with_capacity(self.selection.len());
        for handle in &self.selection {
            let doc = self.load(handle).await?;
            files.push(PlannedFile {
                name: handle.name().to_string(),
                pages: self.capability.page_indices(&doc).len(),
            });
        }

        let total_pages = files.iter().map(|f| f.pages).sum();
        Ok(MergePlan { files, total_pages })
    }

    /// Empty the selection, revoke any download and return to idle.
    pub fn clear(&mut self) {
        self.discard_result();
        self.selection = SelectedFileSet::new();
        tracing::debug!("Selection cleared");
        self.transition(StatusEvent::Cleared);
    }

    /// Bytes behind a download reference.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::ReferenceRevoked`] if the reference has been
    /// revoked.
    pub fn download(&self, reference: &DownloadRef) -> Result<Arc<[u8]>> {
        self.store.resolve(reference)
    }

    /// Run the merge pipeline over the current selection.
    ///
    /// Returns the serialized output and its page count. Nothing is stored;
    /// on error the partial output is dropped.
    async fn combine(&self) -> Result<(Vec<u8>, usize)> {
        let cap = &self.capability;
        let total = self.selection.len();

        let mut output = cap.create().await.map_err(|e| {
            PdfMergeError::merge_failed(format!("Failed to create output document: {e}"))
        })?;

        let mut pages = 0;
        for (position, handle) in self.selection.iter().enumerate() {
            let source = self.load(handle).await?;

            let indices = cap.page_indices(&source);
            let copied = cap
                .copy_pages(&mut output, &source, &indices)
                .await
                .map_err(|e| PdfMergeError::copy_failure(handle.name(), e))?;
            for page in copied {
                cap.add_page(&mut output, page)
                    .map_err(|e| PdfMergeError::copy_failure(handle.name(), e))?;
            }

            pages += indices.len();
            tracing::debug!("Appended {} page(s) from {}", indices.len(), handle.name());
            self.publish(StatusEvent::FileMerged {
                index: position + 1,
                total,
                name: handle.name().to_string(),
                pages: indices.len(),
            });
        }

        let bytes = cap
            .save(output, self.options.save)
            .await
            .map_err(PdfMergeError::serialize_failure)?;

        Ok((bytes, pages))
    }

    /// Read and parse one selected file.
    async fn load(&self, handle: &FileHandle) -> Result<C::Document> {
        let bytes = handle.read().await?;
        tracing::debug!("Loading {} ({} bytes)", handle.name(), bytes.len());

        self.capability
            .load(bytes, self.options.load)
            .await
            .map_err(|e| PdfMergeError::parse_failure(handle.name(), e))
    }

    /// Drop the stored result and revoke its download.
    fn discard_result(&mut self) {
        if let Some(previous) = self.result.take() {
            self.store.revoke(&previous.download);
        }
    }

    /// Apply the status implied by `event` and publish it.
    fn transition(&mut self, event: StatusEvent) {
        self.status = event.status();
        self.publish(event);
    }

    fn publish(&self, event: StatusEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
