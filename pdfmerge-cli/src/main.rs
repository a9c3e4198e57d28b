//! pdfmerge - Merge PDF files into a single document.
//!
//! Files named on the command line play the part of a file picker and the
//! merged blob is written to the output path in place of a download link.

mod cli;

use clap::Parser;
use std::process;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfmerge::capability::DocumentInfo;
use pdfmerge::config::{Config, OverwriteMode};
use pdfmerge::error::PdfMergeError;
use pdfmerge::io::{BlobWriter, open_inputs};
use pdfmerge::output::{
    EventRenderer, OutputFormatter, display_input_statistics, display_plan, display_selection,
    display_write_statistics,
};
use pdfmerge::status::StatusEvent;
use pdfmerge::{LopdfCapability, MergeOrchestrator};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&cli);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install a stderr subscriber whose level follows `-v` and `-q`.
fn init_tracing(cli: &Cli) {
    let directive = if cli.quiet {
        "off"
    } else if cli.verbose {
        "pdfmerge=debug"
    } else {
        "pdfmerge=error"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfMergeError> {
    cli.validate()?;
    let config = cli.to_config()?;

    // Keep stdout clean for JSON lines.
    let formatter = if config.json_events {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };
    let mut renderer = EventRenderer::from_config(&config);

    formatter.debug(&format!("{} v{}", pdfmerge::NAME, pdfmerge::VERSION));

    let (inputs, input_stats) = open_inputs(config.inputs()).await?;
    if formatter.is_verbose() {
        display_input_statistics(&formatter, &input_stats);
    }

    let mut orchestrator = MergeOrchestrator::new(capability(), config.merge_options());
    let mut events = orchestrator.subscribe();

    orchestrator.select(inputs.into_iter().map(|input| input.handle));
    drain_events(&mut events, &mut renderer);

    if config.dry_run {
        let plan = orchestrator.plan().await?;
        if config.json_events {
            let line = serde_json::to_string(&plan)
                .map_err(|e| PdfMergeError::other(format!("Failed to serialize plan: {e}")))?;
            println!("{line}");
        } else {
            display_plan(&formatter, &plan);
            formatter.info(&format!("Output would be: {}", config.output.display()));
        }
        return Ok(());
    }

    display_selection(&formatter, &orchestrator.selection().summaries());

    let writer = BlobWriter::new();
    writer.can_write(&config.output).await?;
    handle_output_overwrite(&writer, &config, &formatter).await?;

    let outcome = {
        let merge = orchestrator.merge();
        tokio::pin!(merge);
        loop {
            tokio::select! {
                outcome = &mut merge => break outcome,
                Ok(event) = events.recv() => renderer.render(&event),
            }
        }
    };
    drain_events(&mut events, &mut renderer);
    let result = outcome?;

    let bytes = orchestrator.download(&result.download)?;
    let write_stats = writer.write_shared(bytes, &config.output).await?;

    display_write_statistics(&formatter, &write_stats);

    Ok(())
}

/// PDF backend stamping this build's name and version as producer.
fn capability() -> LopdfCapability {
    LopdfCapability::with_info(DocumentInfo::new(format!(
        "{} {}",
        pdfmerge::NAME,
        pdfmerge::VERSION
    )))
}

/// Render every event already queued on the channel.
fn drain_events(events: &mut broadcast::Receiver<StatusEvent>, renderer: &mut EventRenderer) {
    loop {
        match events.try_recv() {
            Ok(event) => renderer.render(&event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!("Skipped {skipped} status event(s)");
            }
            Err(_) => break,
        }
    }
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    writer: &BlobWriter,
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), PdfMergeError> {
    if !writer.exists(&config.output).await {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(PdfMergeError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            if formatter.is_quiet() {
                return Err(PdfMergeError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| PdfMergeError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(PdfMergeError::Cancelled)
            }
        }
    }
}
