//! CLI argument parsing for pdfmerge.
//!
//! Positional arguments stand in for a file picker: each is a path or a
//! glob pattern, and the files are offered for merging in the order given.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfmerge::capability::CompressionLevel;
use pdfmerge::config::{Config, OverwriteMode};
use pdfmerge::error::{PdfMergeError, Result};
use pdfmerge::utils::collect_paths_for_patterns;

/// Merge PDF files into a single document.
///
/// Only files recognised as PDF by their extension are merged; anything
/// else is skipped with a warning. Pages are appended in argument order.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Merge PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input files or glob patterns, merged in order
    ///
    /// Examples:
    ///   pdfmerge a.pdf b.pdf -o out.pdf
    ///   pdfmerge 'scans/*.pdf'
    #[arg(value_name = "FILE|GLOB")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE", default_value = "merged.pdf")]
    pub output: PathBuf,

    /// Print the merge plan without producing output
    ///
    /// Every selected file is parsed and its page count reported.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Show each merged file and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Compression level for the output PDF
    ///
    /// - none: write streams as they are
    /// - standard: compress uncompressed streams (default)
    /// - maximum: drop unreachable objects, then compress
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Refuse inputs that are still encrypted after loading
    ///
    /// By default encryption metadata is dropped and the file is merged
    /// as far as the parser allows.
    #[arg(long)]
    pub strict_encryption: bool,

    /// Print status events as JSON lines on stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Glob patterns are expanded here; literal paths pass through
    /// untouched so a missing file is reported when it is opened.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid or matches nothing, or if
    /// the resulting configuration does not validate.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs: collect_paths_for_patterns(&self.inputs)?,
            output: self.output.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            overwrite_mode,
            compression,
            ignore_encryption: !self.strict_encryption,
            json_events: self.json,
        };

        config.validate().map_err(|e| {
            PdfMergeError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.iter().any(|input| input.trim().is_empty()) {
            return Err(PdfMergeError::invalid_config("Empty input path"));
        }

        if self.json && self.verbose {
            return Err(PdfMergeError::invalid_config(
                "Cannot use both --json and --verbose",
            ));
        }

        Ok(())
    }
}
