//! pdfmerge - Combine PDF files into a single document.
//!
//! This library merges an ordered selection of PDF files into one PDF and
//! hands the result back as a revocable download reference. It provides:
//!
//! - A merge orchestrator with observable status events
//! - A pluggable PDF capability, with an implementation on `lopdf`
//! - An in-memory download store
//! - Configuration, output rendering and file helpers for front ends
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use pdfmerge::{FileHandle, LopdfCapability, MergeOptions, MergeOrchestrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut orchestrator = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
//! orchestrator.select(vec![
//!     FileHandle::from_path("a.pdf"),
//!     FileHandle::from_path("b.pdf"),
//! ]);
//!
//! let result = orchestrator.merge().await?;
//! let bytes = orchestrator.download(&result.download)?;
//! println!("Created {} page document ({} bytes)", result.pages, bytes.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Watching Progress
//!
//! ```no_run
//! use pdfmerge::{FileHandle, LopdfCapability, MergeOptions, MergeOrchestrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut orchestrator = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
//! let mut events = orchestrator.subscribe();
//!
//! orchestrator.select(vec![FileHandle::from_path("a.pdf")]);
//! let _ = orchestrator.merge().await;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{}", event.message());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod capability;
pub mod config;
pub mod download;
pub mod error;
pub mod io;
pub mod orchestrator;
pub mod output;
pub mod selection;
pub mod status;
pub mod utils;

// Re-export commonly used types
pub use capability::{
    CompressionLevel, LoadOptions, LopdfCapability, PdfCapability, SaveOptions,
};
pub use config::Config;
pub use download::{DownloadRef, DownloadStore};
pub use error::{PdfMergeError, Result};
pub use orchestrator::{MergeOptions, MergeOrchestrator, MergePlan, MergeResult};
pub use selection::{FileHandle, PDF_MIME_TYPE, SelectedFileSet};
pub use status::{OperationStatus, StatusEvent};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
