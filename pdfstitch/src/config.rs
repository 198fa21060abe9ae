//! Configuration module for pdfstitch.
//!
//! This module holds the validated, normalized settings that drive one
//! request. It handles:
//! - Validation of option combinations
//! - Application of defaults (output names, batch limit)
//! - Conversion into a [`Request`](crate::request::Request)

use anyhow::{Result, bail};

use crate::StitchError;
use crate::merge::OrderSpecification;
use crate::request::{Action, ProcessOptions};
use std::{path::PathBuf, str::FromStr};

/// Upper bound on the number of documents in one request.
pub const DEFAULT_MAX_DOCUMENTS: usize = 20;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - preserves exact quality and structure.
    None,
    /// Compress streams.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = StitchError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(StitchError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: none, standard, maximum"
                ),
            }),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if the output exists.
    NoClobber,
}

/// Complete configuration for one request.
#[derive(Debug, Clone)]
pub struct Config {
    /// Action to perform.
    pub action: Action,

    /// Input PDF file paths (upload order).
    pub inputs: Vec<PathBuf>,

    /// Chosen concatenation order; `None` keeps upload order.
    pub order: Option<OrderSpecification>,

    /// Output file.
    pub output: PathBuf,

    /// Validate and preview without writing output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Print the dry-run summary as JSON.
    pub json: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Compression level for merged output.
    pub compression: CompressionLevel,

    /// Maximum number of documents per request.
    pub max_documents: usize,

    /// Number of parallel loading jobs (None = auto-detect).
    pub jobs: Option<usize>,
}

impl Config {
    /// Configuration for `action` over `inputs` with every other setting
    /// at its default. The output is the action's fixed name in the current
    /// directory.
    pub fn new(action: Action, inputs: Vec<PathBuf>) -> Self {
        Self {
            action,
            inputs,
            order: None,
            output: PathBuf::from(action.default_output()),
            dry_run: false,
            verbose: false,
            quiet: false,
            json: false,
            overwrite_mode: OverwriteMode::default(),
            compression: CompressionLevel::default(),
            max_documents: DEFAULT_MAX_DOCUMENTS,
            jobs: None,
        }
    }

    /// Validate the configuration.
    ///
    /// The batch limit itself is enforced per request, so that an oversized
    /// batch reports `CountExceeded` rather than a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count or batch limit is zero
    /// - A single-document action has more than one input
    /// - An order is given for an action other than merge
    /// - The output path is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if self.max_documents == 0 {
            bail!("Maximum number of documents must be at least 1");
        }

        if self.action.is_single_document() && self.inputs.len() > 1 {
            bail!(
                "The {} action takes exactly one input file, got {}",
                self.action,
                self.inputs.len()
            );
        }

        if self.order.is_some() && self.action != Action::Merge {
            bail!("An order can only be given when merging");
        }

        for input in &self.inputs {
            if input == &self.output {
                bail!(
                    "Output cannot be the same as an input file: {}",
                    self.output.display()
                );
            }
        }

        Ok(())
    }

    /// Get the effective number of parallel jobs.
    ///
    /// Returns the configured job count, or the number of CPU cores if auto-detect.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Options for the request processor.
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            max_documents: self.max_documents,
            compression: self.compression,
        }
    }

}
