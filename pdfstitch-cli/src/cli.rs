//! CLI argument parsing for pdfstitch.
//!
//! This module defines the command-line interface using `clap` and turns
//! parsed arguments into a validated [`Config`]. It is also compiled by
//! `build.rs` to render the man page, so it only depends on `clap` and the
//! library crate.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pdfstitch::config::{CompressionLevel, Config, DEFAULT_MAX_DOCUMENTS, OverwriteMode};
use pdfstitch::merge::OrderSpecification;
use pdfstitch::request::Action;
use pdfstitch::utils::collect_paths_for_patterns;
use pdfstitch::{Result, StitchError};

/// Merge, split and compress PDF documents.
///
/// Merging concatenates every input in a chosen order. The order must name
/// each input exactly once; without one, inputs are merged in the order
/// given on the command line.
#[derive(Parser, Debug)]
#[command(name = "pdfstitch")]
#[command(version)]
#[command(about = "Merge, split and compress PDF documents", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Action to perform
    #[command(subcommand)]
    pub command: Command,
}

/// Available actions.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate PDF files in a chosen order
    ///
    /// Examples:
    ///   pdfstitch merge a.pdf b.pdf --order b.pdf,a.pdf
    ///   pdfstitch merge 'chapter*.pdf' -o book.pdf
    Merge(MergeArgs),

    /// Write every page of a PDF to its own file
    ///
    /// Pages are bundled as page_1.pdf, page_2.pdf, ... into one zip
    /// archive.
    Split(SplitArgs),

    /// Rewrite a PDF with maximum compression
    Compress(CompressArgs),
}

/// Arguments of `pdfstitch merge`.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Input PDF files or glob patterns
    ///
    /// Each input is identified by its file name.
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path [default: merged.pdf]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Concatenation order as comma-separated file names
    ///
    /// Must name every input exactly once. Use --order-file for names that
    /// contain a comma.
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    pub order: Vec<String>,

    /// Read the concatenation order from a file
    ///
    /// One name per line, taken verbatim apart from surrounding
    /// whitespace. Lines starting with '#' are ignored.
    #[arg(long, value_name = "FILE", conflicts_with = "order")]
    pub order_file: Option<PathBuf>,

    /// Maximum number of documents in one merge
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DOCUMENTS)]
    pub max_files: usize,

    /// Compression level for output PDF
    ///
    /// - none: No compression (preserves exact structure)
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and drop unused objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Number of files to read concurrently
    ///
    /// Default is number of CPU cores.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Dry run - validate inputs and order, print the merge plan
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments of `pdfstitch split`.
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output zip archive [default: split_pages.zip]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments of `pdfstitch compress`.
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Output PDF file path [default: compressed.pdf]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Flags shared by every action.
#[derive(Args, Debug, Clone, Copy)]
pub struct CommonArgs {
    /// Overwrite existing output without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Verbose output - show per-file details
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CommonArgs {
    fn overwrite_mode(&self) -> OverwriteMode {
        if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        }
    }

    fn apply(&self, config: &mut Config) {
        config.verbose = self.verbose;
        config.quiet = self.quiet;
        config.overwrite_mode = self.overwrite_mode();
    }
}

impl Cli {
    /// Flags shared by every action.
    pub fn common(&self) -> &CommonArgs {
        match &self.command {
            Command::Merge(args) => &args.common,
            Command::Split(args) => &args.common,
            Command::Compress(args) => &args.common,
        }
    }

    /// Convert CLI arguments into a validated Config.
    ///
    /// Expands glob patterns, reads the order file and resolves defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a pattern, the order file or the
    /// resulting configuration is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let config = match &self.command {
            Command::Merge(args) => args.to_config()?,
            Command::Split(args) => {
                single_config(Action::Split, &args.input, args.output.as_ref(), &args.common)
            }
            Command::Compress(args) => {
                single_config(Action::Compress, &args.input, args.output.as_ref(), &args.common)
            }
        };

        config.validate().map_err(|e| {
            StitchError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }
}

impl MergeArgs {
    fn to_config(&self) -> Result<Config> {
        let inputs = collect_paths_for_patterns(&self.inputs)?;
        let mut config = Config::new(Action::Merge, inputs);

        config.order = self.order_specification()?;
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        config.compression = CompressionLevel::from_str(&self.compression)?;
        config.max_documents = self.max_files;
        config.jobs = self.jobs;
        config.dry_run = self.dry_run;
        config.json = self.json;
        self.common.apply(&mut config);

        Ok(config)
    }

    fn order_specification(&self) -> Result<Option<OrderSpecification>> {
        if !self.order.is_empty() {
            return Ok(Some(OrderSpecification::new(
                self.order.iter().map(|name| name.trim()),
            )));
        }

        let Some(path) = &self.order_file else {
            return Ok(None);
        };

        let list = std::fs::read_to_string(path).map_err(|e| {
            StitchError::invalid_config(format!(
                "Failed to read order file {}: {e}",
                path.display()
            ))
        })?;

        Ok(Some(OrderSpecification::parse_list(&list)))
    }
}

fn single_config(
    action: Action,
    input: &Path,
    output: Option<&PathBuf>,
    common: &CommonArgs,
) -> Config {
    let mut config = Config::new(action, vec![input.to_path_buf()]);
    if let Some(output) = output {
        config.output = output.clone();
    }
    common.apply(&mut config);
    config
}
