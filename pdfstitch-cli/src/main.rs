//! pdfstitch - Merge, split and compress PDF documents.
//!
//! Command-line front end: reads inputs from disk, runs one request through
//! the library's processor and writes the resulting artifacts.

mod cli;

use clap::Parser;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfstitch::config::{Config, OverwriteMode};
use pdfstitch::document::UploadedDocument;
use pdfstitch::io::{ArtifactWriter, UploadReader};
use pdfstitch::merge::{OrderSpecification, check_batch_size};
use pdfstitch::output::{
    OutputFormatter, display_load_statistics, display_merge_plan, display_merge_statistics,
};
use pdfstitch::utils::format_file_size;
use pdfstitch::validation::Validator;
use pdfstitch::{Action, Outcome, Processor, Request, StitchError};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.common().verbose);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "pdfstitch=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), StitchError> {
    let config = cli.to_config()?;
    debug!(
        action = %config.action,
        inputs = config.inputs.len(),
        output = %config.output.display(),
        "configuration resolved"
    );
    let formatter = OutputFormatter::from_config(&config);

    if formatter.is_verbose() {
        formatter.section(&format!("{} v{}", pdfstitch::NAME, pdfstitch::VERSION));
        formatter.blank_line();
    }

    // Oversized batches are rejected before anything is read.
    check_batch_size(config.inputs.len(), config.max_documents)?;

    formatter.debug(&format!("Reading {} file(s)...", config.inputs.len()));
    let uploads = load_uploads(&config, &formatter).await?;

    let order = config
        .order
        .clone()
        .unwrap_or_else(|| OrderSpecification::upload_order(&uploads));

    if config.dry_run {
        return dry_run(&config, &formatter, &uploads, &order);
    }

    handle_output_overwrite(&config, &formatter).await?;

    let request = build_request(config.action, uploads, order)?;
    let processor = Processor::new(config.process_options());

    formatter.info(&format!("Running {}...", config.action));
    let outcome = tokio::task::spawn_blocking(move || processor.process(request))
        .await
        .map_err(|e| StitchError::other(format!("Processing task failed: {e}")))??;

    write_outcome(&config, &formatter, outcome).await
}

async fn load_uploads(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<Vec<UploadedDocument>, StitchError> {
    let (results, stats) = UploadReader::new()
        .load_all(&config.inputs, config.effective_jobs())
        .await;

    display_load_statistics(formatter, &stats);

    results
        .into_iter()
        .map(|result| result.map(|loaded| loaded.upload))
        .collect()
}

fn build_request(
    action: Action,
    uploads: Vec<UploadedDocument>,
    order: OrderSpecification,
) -> Result<Request, StitchError> {
    if action == Action::Merge {
        return Ok(Request::merge(uploads, order));
    }

    let mut uploads = uploads.into_iter();
    let upload = uploads
        .next()
        .ok_or_else(|| StitchError::validation("No input document"))?;
    if uploads.next().is_some() {
        return Err(StitchError::validation(format!(
            "The {action} action takes exactly one document"
        )));
    }

    Ok(match action {
        Action::Split => Request::split(upload),
        _ => Request::compress(upload),
    })
}

/// Validate inputs and order and print the plan without writing anything.
fn dry_run(
    config: &Config,
    formatter: &OutputFormatter,
    uploads: &[UploadedDocument],
    order: &OrderSpecification,
) -> Result<(), StitchError> {
    let output = config.output.display().to_string();
    let plan = Validator::new().plan(uploads, order, &output)?;

    if config.json {
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    display_merge_plan(formatter, &plan);
    formatter.blank_line();
    formatter.success("Dry run completed successfully");
    formatter.info("  Run without --dry-run to create the merged PDF");
    Ok(())
}

async fn write_outcome(
    config: &Config,
    formatter: &OutputFormatter,
    outcome: Outcome,
) -> Result<(), StitchError> {
    let writer = ArtifactWriter::new();

    match outcome {
        Outcome::Merged(merged) => {
            let write_stats = writer.save(merged.artifact(), &config.output).await?;
            display_merge_statistics(formatter, merged.statistics(), &write_stats);
        }
        Outcome::Split(archive) => {
            let write_stats = writer.save(&archive, &config.output).await?;
            formatter.success(&format!(
                "Split into {} page(s): {}",
                archive.page_count,
                config.output.display()
            ));
            formatter.detail("Archive size", &write_stats.format_file_size());
        }
        Outcome::Compressed {
            artifact,
            input_size,
        } => {
            let write_stats = writer.save(&artifact, &config.output).await?;
            formatter.success(&format!(
                "Compressed {} -> {} ({})",
                format_file_size(input_size),
                write_stats.format_file_size(),
                config.output.display()
            ));
        }
    }

    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), StitchError> {
    let exists = tokio::fs::try_exists(&config.output).await.unwrap_or(false);
    if !exists {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(StitchError::output_exists(config.output.clone())),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet mode
            if formatter.is_quiet() {
                return Err(StitchError::output_exists(config.output.clone()));
            }

            formatter.warning(&format!(
                "Output already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| StitchError::other(format!("Failed to read input: {err}")))?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(StitchError::Cancelled),
            }
        }
    }
}
