//! pdfstitch - Merge, split and compress PDF documents.
//!
//! The core of the library is a pure request processor: a [`Request`]
//! names some uploaded documents, an order and an action, and
//! [`Processor::process`] turns it into an [`Outcome`] without touching
//! the filesystem. Everything around it is optional plumbing:
//!
//! - Ordered concatenation with strict order validation
//! - Splitting into single pages and recompression
//! - Concurrent loading and atomic writing of files
//! - Dry-run inspection with JSON output
//!
//! # Examples
//!
//! ## Merging in a chosen order
//!
//! ```no_run
//! use pdfstitch::{Outcome, Processor, Request, UploadedDocument};
//! use pdfstitch::merge::OrderSpecification;
//!
//! # fn example(a: Vec<u8>, b: Vec<u8>) -> pdfstitch::Result<()> {
//! let documents = vec![
//!     UploadedDocument::new("a.pdf", a),
//!     UploadedDocument::new("b.pdf", b),
//! ];
//! let order = OrderSpecification::new(["b.pdf", "a.pdf"]);
//!
//! if let Outcome::Merged(merged) = Processor::default().process(Request::merge(documents, order))? {
//!     println!("{} has {} pages", merged.file_name(), merged.page_count());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with files
//!
//! ```no_run
//! use pdfstitch::io::{ArtifactWriter, UploadReader};
//! use pdfstitch::merge::MergeSession;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let uploads = UploadReader::new().load_uploads(&paths, 4).await?;
//!
//! let mut session = MergeSession::new();
//! session.add_all(uploads);
//! let merged = session.merge()?;
//!
//! ArtifactWriter::new()
//!     .save(merged.artifact(), Path::new("merged.pdf"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod merge;
pub mod output;
pub mod request;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use document::{Artifact, MergedArtifact, UploadedDocument};
pub use error::{Result, StitchError};
pub use request::{Action, Outcome, Processor, Request};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
