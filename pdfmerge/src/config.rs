//! Configuration module for pdfmerge.
//!
//! This module turns CLI arguments into a validated configuration that
//! drives a merge. It handles:
//! - Validation of argument combinations
//! - Application of defaults
//! - Conversion into the options the orchestrator consumes

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::capability::{CompressionLevel, LoadOptions, SaveOptions};
use crate::download::DEFAULT_FILENAME;
use crate::orchestrator::MergeOptions;

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input files or glob patterns, in merge order.
    pub inputs: Vec<PathBuf>,

    /// Where the merged PDF is written.
    pub output: PathBuf,

    /// Dry run mode - report the merge plan without producing output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Load inputs that carry encryption metadata.
    pub ignore_encryption: bool,

    /// Emit status events as JSON lines.
    pub json_events: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: PathBuf::from(DEFAULT_FILENAME),
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            ignore_encryption: true,
            json_events: false,
        }
    }
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// An empty input list is accepted; the merge itself reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - The output path is empty
    /// - The output path is also an input
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.output.as_os_str().is_empty() {
            bail!("Output path cannot be empty");
        }

        if self.inputs.iter().any(|input| same_path(input, &self.output)) {
            bail!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            );
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }

    /// Options the orchestrator applies to the merge.
    ///
    /// The suggested download name is the output file name.
    pub fn merge_options(&self) -> MergeOptions {
        let filename = self
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        MergeOptions {
            load: LoadOptions {
                ignore_encryption: self.ignore_encryption,
            },
            save: SaveOptions {
                compression: self.compression,
            },
            filename,
        }
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
