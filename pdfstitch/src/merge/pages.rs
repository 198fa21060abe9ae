//! Page-level operations.
//!
//! This module handles:
//! - Page counting
//! - Extracting a single page into its own document
//! - Splitting a document into one document per page
//! - Bundling the split pages into a single zip archive

use lopdf::Document;
use std::io::{Cursor, Write};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::CompressionLevel;
use crate::document::{Artifact, UploadedDocument};
use crate::error::{Result, StitchError};
use crate::merge::compress::optimize;
use crate::utils::{parse_document, serialize_document};

/// File name of the `n`th (1-indexed) page produced by a split.
pub fn page_file_name(page_number: u32) -> String {
    format!("page_{page_number}.pdf")
}

/// Name the split archive is delivered under.
pub const SPLIT_ARCHIVE_NAME: &str = "split_pages.zip";

/// Page splitter producing one single-page document per source page.
#[derive(Debug, Clone, Default)]
pub struct PageSplitter;

impl PageSplitter {
    /// Create a new page splitter.
    pub fn new() -> Self {
        Self
    }

    /// Split `upload` into single-page artifacts named `page_<n>.pdf`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The payload cannot be parsed (`MalformedInput`)
    /// - The document has no pages (`Validation`)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfstitch::document::UploadedDocument;
    /// # use pdfstitch::merge::PageSplitter;
    /// # fn example(upload: UploadedDocument) -> pdfstitch::Result<()> {
    /// let pages = PageSplitter::new().split(&upload)?;
    /// for page in &pages {
    ///     println!("{} ({})", page.file_name, page.format_size());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn split(&self, upload: &UploadedDocument) -> Result<Vec<Artifact>> {
        let doc = parse_document(upload.name(), upload.bytes())?;
        let page_count = self.page_count(&doc) as u32;

        if page_count == 0 {
            return Err(StitchError::validation(format!(
                "Document '{}' has no pages to split",
                upload.name()
            )));
        }

        let mut artifacts = Vec::with_capacity(page_count as usize);
        for page_number in 1..=page_count {
            let mut single = self.extract_page(&doc, page_number)?;
            let bytes = serialize_document(&mut single)?;
            debug!(page = page_number, bytes = bytes.len(), "extracted page");

            artifacts.push(Artifact {
                file_name: page_file_name(page_number),
                bytes,
                page_count: 1,
            });
        }

        info!(
            document = upload.name(),
            pages = page_count,
            "split document"
        );

        Ok(artifacts)
    }

    /// Split `upload` and bundle the pages into one `split_pages.zip`
    /// archive, entries in page order.
    ///
    /// The archive's `page_count` is the number of pages it holds.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`split`](Self::split), or `Other` if the
    /// archive cannot be assembled.
    pub fn split_archive(&self, upload: &UploadedDocument) -> Result<Artifact> {
        let pages = self.split(upload)?;
        bundle_pages(&pages)
    }

    /// Build a document containing only page `page_number` (1-indexed).
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the page does not exist.
    pub fn extract_page(&self, doc: &Document, page_number: u32) -> Result<Document> {
        let page_count = self.page_count(doc) as u32;
        if page_number == 0 || page_number > page_count {
            return Err(StitchError::validation(format!(
                "Page {page_number} does not exist (document has {page_count} pages)"
            )));
        }

        let mut single = doc.clone();
        let others: Vec<u32> = (1..=page_count).filter(|&n| n != page_number).collect();
        single.delete_pages(&others);

        optimize(&mut single, CompressionLevel::Maximum);
        single.renumber_objects();

        if self.page_count(&single) != 1 {
            return Err(StitchError::merge_failed(format!(
                "Failed to isolate page {page_number}"
            )));
        }

        Ok(single)
    }

    /// Get the number of pages in a document.
    pub fn page_count(&self, doc: &Document) -> usize {
        doc.get_pages().len()
    }
}

/// Pack single-page artifacts into a deflated zip archive.
pub fn bundle_pages(pages: &[Artifact]) -> Result<Artifact> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for page in pages {
        zip.start_file(page.file_name.as_str(), options)
            .map_err(archive_error)?;
        zip.write_all(&page.bytes).map_err(archive_error)?;
    }

    let bytes = zip.finish().map_err(archive_error)?.into_inner();
    debug!(entries = pages.len(), bytes = bytes.len(), "bundled split pages");

    Ok(Artifact {
        file_name: SPLIT_ARCHIVE_NAME.to_string(),
        bytes,
        page_count: pages.iter().map(|page| page.page_count).sum(),
    })
}

fn archive_error(err: impl std::fmt::Display) -> StitchError {
    StitchError::other(format!("Failed to build split archive: {err}"))
}
