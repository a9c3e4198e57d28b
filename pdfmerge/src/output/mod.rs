//! Output formatting and display for pdfmerge.
//!
//! This module handles all user-facing output including:
//! - Rendering status events as text or as JSON lines
//! - Progress indicators
//! - Merge plans and write summaries
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::output::{EventRenderer, OutputFormatter};
//! use pdfmerge::status::StatusEvent;
//!
//! let mut renderer = EventRenderer::human(OutputFormatter::default());
//! renderer.render(&StatusEvent::Started { files: 2 });
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::error::{PdfMergeError, Result};
use crate::io::{InputStatistics, WriteStatistics};
use crate::orchestrator::MergePlan;
use crate::selection::SelectedFile;
use crate::status::StatusEvent;

/// Create an output formatter from configuration.
pub fn create_formatter(config: &Config) -> OutputFormatter {
    OutputFormatter::from_config(config)
}

/// Serialize an event as one JSON line.
pub fn json_line(event: &StatusEvent) -> Result<String> {
    serde_json::to_string(event)
        .map_err(|e| PdfMergeError::other(format!("Failed to serialize event: {e}")))
}

/// Presents status events to the user.
pub enum EventRenderer {
    /// Human-readable messages with a progress bar.
    Human {
        /// Formatter used for messages.
        formatter: OutputFormatter,
        /// Progress of the running merge, if any.
        progress: Option<ProgressBar>,
    },
    /// One JSON object per event on stdout.
    Json,
}

impl EventRenderer {
    /// Human-readable renderer.
    pub fn human(formatter: OutputFormatter) -> Self {
        Self::Human {
            formatter,
            progress: None,
        }
    }

    /// JSON lines renderer.
    pub fn json() -> Self {
        Self::Json
    }

    /// Renderer matching the configuration.
    pub fn from_config(config: &Config) -> Self {
        if config.json_events {
            Self::json()
        } else {
            Self::human(create_formatter(config))
        }
    }

    /// Present one event.
    pub fn render(&mut self, event: &StatusEvent) {
        match self {
            Self::Json => match json_line(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("{e}"),
            },
            Self::Human {
                formatter,
                progress,
            } => render_human(formatter, progress, event),
        }
    }
}

fn render_human(
    formatter: &OutputFormatter,
    progress: &mut Option<ProgressBar>,
    event: &StatusEvent,
) {
    match event {
        StatusEvent::Selected { dropped, .. } => {
            if *dropped > 0 {
                formatter.warning(&event.message());
            } else {
                formatter.debug(&event.message());
            }
        }
        StatusEvent::Started { files } => {
            formatter.info(&event.message());
            // Per-file lines replace the bar in verbose mode.
            if formatter.should_print() && !formatter.is_verbose() {
                let mut bar = ProgressBar::new(*files, ProgressStyle::Bar);
                bar.set_message("Merging");
                *progress = Some(bar);
            }
        }
        StatusEvent::FileMerged { index, .. } => {
            formatter.debug(&event.message());
            if let Some(bar) = progress.as_mut() {
                bar.update(*index);
            }
        }
        StatusEvent::Succeeded { .. } => {
            if let Some(mut bar) = progress.take() {
                bar.finish();
            }
            formatter.success(&event.message());
        }
        StatusEvent::Failed { reason } => {
            if let Some(bar) = progress.take() {
                bar.clear();
            }
            formatter.error(reason);
        }
        StatusEvent::Cleared => formatter.debug(&event.message()),
    }
}

/// List the selected files in merge order.
pub fn display_selection(formatter: &OutputFormatter, files: &[SelectedFile]) {
    if files.is_empty() {
        return;
    }
    formatter.section("Selected files:");
    for (i, file) in files.iter().enumerate() {
        formatter.list_item(i + 1, &file.name);
    }
}

/// Display a merge plan.
pub fn display_plan(formatter: &OutputFormatter, plan: &MergePlan) {
    formatter.section("Merge plan:");
    for (i, file) in plan.files.iter().enumerate() {
        formatter.list_item(i + 1, &format!("{} ({} page(s))", file.name, file.pages));
    }
    formatter.info(&format!(
        "Would merge {} file(s) into {} page(s)",
        plan.files.len(),
        plan.total_pages
    ));
}

/// Display input statistics.
pub fn display_input_statistics(formatter: &OutputFormatter, stats: &InputStatistics) {
    formatter.detail("Inputs", &stats.files.to_string());
    formatter.detail("PDF inputs", &stats.pdf_files.to_string());
    formatter.detail("Input size", &stats.format_total_size());
}

/// Display write statistics.
pub fn display_write_statistics(formatter: &OutputFormatter, stats: &WriteStatistics) {
    formatter.success(&format!(
        "Wrote {} ({})",
        stats.output_path.display(),
        stats.format_file_size()
    ));
    formatter.detail(
        "Write time",
        &format!("{:.2}s", stats.write_time.as_secs_f64()),
    );
}
