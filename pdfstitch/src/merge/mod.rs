//! PDF page operations.
//!
//! This module provides the document-level work behind each action:
//! - Ordered concatenation ([`Merger`])
//! - Order validation ([`OrderSpecification`])
//! - Splitting into single pages bundled as a zip archive ([`PageSplitter`])
//! - Compression ([`Compressor`])
//! - The `Collecting -> Merged` session ([`MergeSession`])
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::document::UploadedDocument;
//! use pdfstitch::merge::MergeSession;
//!
//! # fn example(a: Vec<u8>, b: Vec<u8>) -> pdfstitch::Result<()> {
//! let mut session = MergeSession::new();
//! session.add(UploadedDocument::new("a.pdf", a));
//! session.add(UploadedDocument::new("b.pdf", b));
//! session.set_order(["b.pdf", "a.pdf"]);
//!
//! let merged = session.merge()?;
//! println!("Merged {} pages", merged.page_count());
//! # Ok(())
//! # }
//! ```

pub mod compress;
pub mod merger;
pub mod order;
pub mod pages;
pub mod session;

pub use compress::Compressor;
pub use merger::{Merger, check_batch_size};
pub use order::OrderSpecification;
pub use pages::{PageSplitter, SPLIT_ARCHIVE_NAME, bundle_pages, page_file_name};
pub use session::MergeSession;

use crate::document::{MergedArtifact, UploadedDocument};
use crate::error::Result;

/// Merge `documents` in `order` with default settings.
///
/// Convenience function that creates a [`Merger`] and performs the merge.
///
/// # Errors
///
/// Returns an error if any merge step fails.
pub fn merge_documents(
    documents: &[UploadedDocument],
    order: &OrderSpecification,
) -> Result<MergedArtifact> {
    Merger::new().merge(documents, order)
}
