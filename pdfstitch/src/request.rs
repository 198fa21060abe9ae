//! Explicit requests and their dispatch.
//!
//! A [`Request`] carries everything one action needs: the uploads, the
//! chosen order and the action itself. [`Processor::process`] is a pure
//! function of the request: it never touches the filesystem and keeps no
//! state between calls.

use std::fmt;
use std::str::FromStr;

use crate::config::{CompressionLevel, DEFAULT_MAX_DOCUMENTS};
use crate::document::{Artifact, MergedArtifact, UploadedDocument};
use crate::error::{Result, StitchError};
use crate::merge::{
    Compressor, Merger, OrderSpecification, PageSplitter, SPLIT_ARCHIVE_NAME, check_batch_size,
};

/// What to do with the uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Concatenate all uploads in the chosen order.
    Merge,
    /// Break a single upload into one document per page.
    Split,
    /// Rewrite a single upload with maximum compression.
    Compress,
}

impl Action {
    /// Fixed name the action's output is delivered under.
    pub const fn default_output(self) -> &'static str {
        match self {
            Self::Merge => "merged.pdf",
            Self::Split => SPLIT_ARCHIVE_NAME,
            Self::Compress => "compressed.pdf",
        }
    }

    /// Whether the action works on exactly one upload.
    pub const fn is_single_document(self) -> bool {
        matches!(self, Self::Split | Self::Compress)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Merge => "merge",
            Self::Split => "split",
            Self::Compress => "compress",
        };
        f.write_str(name)
    }
}

impl FromStr for Action {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "split" => Ok(Self::Split),
            "compress" => Ok(Self::Compress),
            _ => Err(StitchError::invalid_config(format!(
                "Invalid action: {s}. Must be one of: merge, split, compress"
            ))),
        }
    }
}

/// One self-contained unit of work.
#[derive(Debug, Clone)]
pub struct Request {
    /// Uploaded documents.
    pub documents: Vec<UploadedDocument>,

    /// Concatenation order. Only consulted by [`Action::Merge`].
    pub order: OrderSpecification,

    /// Action to perform.
    pub action: Action,
}

impl Request {
    /// Merge `documents` in `order`.
    pub fn merge(documents: Vec<UploadedDocument>, order: OrderSpecification) -> Self {
        Self {
            documents,
            order,
            action: Action::Merge,
        }
    }

    /// Split a single document into pages.
    pub fn split(document: UploadedDocument) -> Self {
        Self::single(document, Action::Split)
    }

    /// Compress a single document.
    pub fn compress(document: UploadedDocument) -> Self {
        Self::single(document, Action::Compress)
    }

    fn single(document: UploadedDocument, action: Action) -> Self {
        let order = OrderSpecification::new([document.name()]);
        Self {
            documents: vec![document],
            order,
            action,
        }
    }
}

/// Result of a processed request.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Output of [`Action::Merge`].
    Merged(MergedArtifact),

    /// Output of [`Action::Split`]: a zip archive with one `page_<n>.pdf`
    /// entry per page, in page order.
    Split(Artifact),

    /// Output of [`Action::Compress`].
    Compressed {
        /// The rewritten document.
        artifact: Artifact,
        /// Size of the upload before compression.
        input_size: u64,
    },
}

/// Options shared by every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Maximum number of uploads per request.
    pub max_documents: usize,

    /// Compression applied to merged output.
    pub compression: CompressionLevel,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            max_documents: DEFAULT_MAX_DOCUMENTS,
            compression: CompressionLevel::Standard,
        }
    }
}

/// Dispatches requests to the component responsible for their action.
#[derive(Debug, Clone)]
pub struct Processor {
    options: ProcessOptions,
    merger: Merger,
    splitter: PageSplitter,
    compressor: Compressor,
}

impl Processor {
    /// Create a processor with the given options.
    pub fn new(options: ProcessOptions) -> Self {
        Self {
            options,
            merger: Merger::new()
                .with_limit(options.max_documents)
                .with_compression(options.compression),
            splitter: PageSplitter::new(),
            compressor: Compressor::new(),
        }
    }

    /// Options this processor was built with.
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Process a request start to finish.
    ///
    /// # Errors
    ///
    /// Returns `CountExceeded` before anything else if the batch is too
    /// large; `Validation` if a single-document action receives a different
    /// number of uploads; otherwise whatever the action's component returns.
    pub fn process(&self, request: Request) -> Result<Outcome> {
        check_batch_size(request.documents.len(), self.options.max_documents)?;

        if request.action.is_single_document() && request.documents.len() != 1 {
            return Err(StitchError::validation(format!(
                "The {} action takes exactly one document, got {}",
                request.action,
                request.documents.len()
            )));
        }

        match request.action {
            Action::Merge => self
                .merger
                .merge(&request.documents, &request.order)
                .map(Outcome::Merged),
            Action::Split => self
                .splitter
                .split_archive(&request.documents[0])
                .map(Outcome::Split),
            Action::Compress => {
                let upload = &request.documents[0];
                let artifact = self.compressor.compress(upload)?;
                Ok(Outcome::Compressed {
                    artifact,
                    input_size: upload.size(),
                })
            }
        }
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(ProcessOptions::default())
    }
}
