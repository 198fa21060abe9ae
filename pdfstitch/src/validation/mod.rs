//! Inspection of uploads ahead of processing.
//!
//! A dry run uses this module to report what a merge would produce without
//! producing it: each upload is parsed and summarised, and the summaries are
//! aggregated in the merge order. Every type here is serde-serializable so
//! the plan can be printed as JSON.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::document::UploadedDocument;
//! use pdfstitch::merge::OrderSpecification;
//! use pdfstitch::validation::Validator;
//!
//! # fn example(uploads: Vec<UploadedDocument>) -> pdfstitch::Result<()> {
//! let order = OrderSpecification::upload_order(&uploads);
//! let plan = Validator::new().plan(&uploads, &order, "merged.pdf")?;
//! println!("{} pages from {} documents", plan.summary.total_pages, plan.summary.documents);
//! # Ok(())
//! # }
//! ```

use lopdf::{Document, Object};
use serde::{Deserialize, Serialize};

use crate::document::UploadedDocument;
use crate::error::{Result, StitchError};
use crate::merge::OrderSpecification;
use crate::utils::{format_file_size, parse_document};

/// Summary of a single upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResult {
    /// Upload name.
    pub name: String,

    /// Number of pages.
    pub page_count: usize,

    /// PDF version string, e.g. `"1.5"`.
    pub version: String,

    /// Payload size in bytes.
    pub size: u64,

    /// First page MediaBox (width, height) in points, if present.
    pub page_dimensions: Option<(f32, f32)>,
}

impl InspectionResult {
    fn from_document(upload: &UploadedDocument, doc: &Document) -> Self {
        let pages = doc.get_pages();

        let page_dimensions = pages
            .values()
            .next()
            .and_then(|page_id| media_box(doc, *page_id));

        Self {
            name: upload.name().to_string(),
            page_count: pages.len(),
            version: doc.version.clone(),
            size: upload.size(),
            page_dimensions,
        }
    }
}

/// Aggregate over several inspected uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Per-upload results, in the order inspected.
    pub results: Vec<InspectionResult>,

    /// Total number of pages.
    pub total_pages: usize,

    /// Total payload size in bytes.
    pub total_size: u64,

    /// Number of uploads.
    pub documents: usize,
}

impl BatchSummary {
    /// Create a summary from inspection results.
    pub fn from_results(results: Vec<InspectionResult>) -> Self {
        let total_pages = results.iter().map(|r| r.page_count).sum();
        let total_size = results.iter().map(|r| r.size).sum();
        let documents = results.len();

        Self {
            results,
            total_pages,
            total_size,
            documents,
        }
    }

    /// Format the total size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// What a merge would produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    /// Name the merged document would be delivered under.
    pub output: String,

    /// Uploads in concatenation order.
    pub summary: BatchSummary,
}

impl MergePlan {
    /// Render the plan as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StitchError::other(format!("Failed to serialize merge plan: {e}")))
    }
}

/// Inspects uploads without modifying them.
#[derive(Debug, Clone, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator.
    pub fn new() -> Self {
        Self
    }

    /// Parse and summarise one upload.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` or `EncryptedInput` if the upload cannot be
    /// parsed, and `MalformedInput` if it has no pages.
    pub fn inspect(&self, upload: &UploadedDocument) -> Result<InspectionResult> {
        let doc = parse_document(upload.name(), upload.bytes())?;

        if doc.get_pages().is_empty() {
            return Err(StitchError::malformed(upload.name(), "document has no pages"));
        }

        Ok(InspectionResult::from_document(upload, &doc))
    }

    /// Inspect several uploads, in the order given.
    ///
    /// # Errors
    ///
    /// Stops at the first upload that fails inspection.
    pub fn inspect_batch(&self, uploads: &[UploadedDocument]) -> Result<BatchSummary> {
        let results = uploads
            .iter()
            .map(|upload| self.inspect(upload))
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchSummary::from_results(results))
    }

    /// Validate `order` against `uploads` and summarise the merge it
    /// describes.
    ///
    /// # Errors
    ///
    /// Returns the same `Validation` errors a merge would, followed by any
    /// inspection failure.
    pub fn plan(
        &self,
        uploads: &[UploadedDocument],
        order: &OrderSpecification,
        output: &str,
    ) -> Result<MergePlan> {
        let sequence = order.resolve(uploads)?;
        let ordered: Vec<UploadedDocument> =
            sequence.into_iter().map(|i| uploads[i].clone()).collect();

        Ok(MergePlan {
            output: output.to_string(),
            summary: self.inspect_batch(&ordered)?,
        })
    }
}

/// MediaBox size of a page, looked up through its ancestors if inherited.
fn media_box(doc: &Document, page_id: lopdf::ObjectId) -> Option<(f32, f32)> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    let mut depth = 0;
    let rect = loop {
        if let Ok(Object::Array(rect)) = node.get(b"MediaBox") {
            break rect;
        }
        depth += 1;
        if depth > 64 {
            return None;
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    };
    if rect.len() < 4 {
        return None;
    }

    let width = rect[2].as_float().ok()? - rect[0].as_float().ok()?;
    let height = rect[3].as_float().ok()? - rect[1].as_float().ok()?;
    Some((width, height))
}
