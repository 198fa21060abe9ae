//! File I/O for pdfstitch.
//!
//! This module handles everything that touches the filesystem:
//! - Reading uploads from disk, several at a time
//! - Writing artifacts atomically
//!
//! The processing core in [`crate::request`] never performs I/O itself.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::{load_upload, save_artifact};
//! use pdfstitch::{Processor, Request, Outcome};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let upload = load_upload(Path::new("input.pdf")).await?;
//! let outcome = Processor::default().process(Request::compress(upload))?;
//! if let Outcome::Compressed { artifact, .. } = outcome {
//!     save_artifact(&artifact, Path::new("compressed.pdf")).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{LoadResult, LoadStatistics, LoadedUpload, UploadReader};
pub use writer::{ArtifactWriter, WriteStatistics};

use crate::document::{Artifact, UploadedDocument};
use crate::error::Result;
use std::path::Path;

/// Read a single upload from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn load_upload(path: &Path) -> Result<UploadedDocument> {
    let loaded = UploadReader::new().load(path).await?;
    Ok(loaded.upload)
}

/// Write a single artifact to a file atomically.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn save_artifact(artifact: &Artifact, path: &Path) -> Result<()> {
    ArtifactWriter::new().save(artifact, path).await?;
    Ok(())
}
