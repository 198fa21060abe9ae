//! Core ordered merge implementation.
//!
//! Uploads are resolved against the caller's order, parsed, and
//! concatenated page tree by page tree. Nothing is returned unless every
//! upload parsed and the output has exactly the expected pages.

use lopdf::{Document, Object, ObjectId};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{CompressionLevel, DEFAULT_MAX_DOCUMENTS};
use crate::document::{Artifact, MergeStatistics, MergedArtifact, PageOrigin, UploadedDocument};
use crate::error::{PdfResultExt, Result, StitchError};
use crate::merge::compress::optimize;
use crate::merge::order::OrderSpecification;
use crate::request::Action;
use crate::utils::{parse_document, serialize_document};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Reject batches that are empty or larger than `limit`.
///
/// Runs before any payload is touched.
pub fn check_batch_size(count: usize, limit: usize) -> Result<()> {
    if count > limit {
        return Err(StitchError::CountExceeded { count, limit });
    }
    if count == 0 {
        return Err(StitchError::validation("No documents were uploaded"));
    }
    Ok(())
}

/// PDF merger that concatenates uploads in a caller-chosen order.
#[derive(Debug, Clone)]
pub struct Merger {
    /// Maximum number of uploads per request.
    limit: usize,

    /// Compression applied to the merged output.
    compression: CompressionLevel,
}

impl Merger {
    /// Create a merger with the default batch limit and standard compression.
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_MAX_DOCUMENTS,
            compression: CompressionLevel::Standard,
        }
    }

    /// Override the batch limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Override the compression level.
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }

    /// Configured batch limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Merge `documents` in the sequence given by `order`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - More than [`limit`](Self::limit) documents were uploaded (`CountExceeded`)
    /// - No documents were uploaded, or `order` is not a permutation of the
    ///   uploaded names (`Validation`)
    /// - Any payload is not a readable PDF (`MalformedInput`, `EncryptedInput`)
    /// - The page tree cannot be assembled (`MergeFailed`)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pdfstitch::document::UploadedDocument;
    /// use pdfstitch::merge::{Merger, OrderSpecification};
    ///
    /// # fn example(a: Vec<u8>, b: Vec<u8>) -> pdfstitch::Result<()> {
    /// let documents = vec![
    ///     UploadedDocument::new("a.pdf", a),
    ///     UploadedDocument::new("b.pdf", b),
    /// ];
    /// let order = OrderSpecification::new(["b.pdf", "a.pdf"]);
    ///
    /// let merged = Merger::new().merge(&documents, &order)?;
    /// println!("{} pages", merged.page_count());
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge(
        &self,
        documents: &[UploadedDocument],
        order: &OrderSpecification,
    ) -> Result<MergedArtifact> {
        let merge_start = Instant::now();

        check_batch_size(documents.len(), self.limit)?;
        let indices = order.resolve(documents)?;

        // Parse everything up front so a bad upload fails the whole request
        let mut sources = Vec::with_capacity(indices.len());
        for idx in indices {
            let upload = &documents[idx];
            let doc = parse_document(upload.name(), upload.bytes())?;
            debug!(
                document = upload.name(),
                pages = doc.get_pages().len(),
                "parsed upload"
            );
            sources.push((upload.name(), doc));
        }

        let mut origins = Vec::new();
        for (name, doc) in &sources {
            let count = doc.get_pages().len();
            origins.extend((1..=count).map(|page| PageOrigin {
                document: (*name).to_string(),
                page,
            }));
        }

        let mut merged = self.concatenate(sources.into_iter().map(|(_, doc)| doc))?;

        optimize(&mut merged, self.compression);
        merged.renumber_objects();

        let total_pages = merged.get_pages().len();
        if total_pages != origins.len() {
            return Err(StitchError::merge_failed(format!(
                "Merged document has {total_pages} page(s), expected {}",
                origins.len()
            )));
        }

        let bytes = serialize_document(&mut merged)?;
        let merge_time = merge_start.elapsed();

        let statistics = MergeStatistics {
            documents_merged: documents.len(),
            total_pages,
            input_size: documents.iter().map(UploadedDocument::size).sum(),
            merge_time,
            compressed: self.compression != CompressionLevel::None,
        };

        info!(
            documents = statistics.documents_merged,
            pages = total_pages,
            elapsed_ms = merge_time.as_millis() as u64,
            "merged documents"
        );

        Ok(MergedArtifact::new(
            Artifact {
                file_name: Action::Merge.default_output().to_string(),
                bytes,
                page_count: total_pages,
            },
            origins,
            statistics,
        ))
    }

    /// Append every document's pages to the first one's page tree.
    fn concatenate(&self, documents: impl IntoIterator<Item = Document>) -> Result<Document> {
        let mut documents = documents.into_iter();
        let mut merged = documents
            .next()
            .ok_or_else(|| StitchError::validation("No documents were uploaded"))?;

        let pages_id = root_pages_id(&merged)?;
        detach_root_attributes(&mut merged, pages_id)?;

        let mut max_id = merged
            .objects
            .keys()
            .map(|id| id.0)
            .max()
            .unwrap_or(0)
            .max(merged.max_id);

        for mut doc in documents {
            // Renumber objects to avoid ID conflicts
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let doc_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

            // Resolve inherited attributes while the source tree is intact
            for &page_id in &doc_pages {
                flatten_inherited_attributes(&mut doc, page_id)?;
            }

            merged.objects.extend(doc.objects);
            self.add_pages_to_tree(&mut merged, pages_id, &doc_pages)?;
        }

        merged.max_id = max_id;
        Ok(merged)
    }

    /// Add pages to the merged document's root page tree node.
    fn add_pages_to_tree(
        &self,
        merged: &mut Document,
        pages_id: ObjectId,
        page_ids: &[ObjectId],
    ) -> Result<()> {
        for &page_id in page_ids {
            merged
                .get_dictionary_mut(page_id)
                .merge_context("Failed to get page")?
                .set("Parent", Object::Reference(pages_id));
        }

        let dict = merged
            .get_dictionary_mut(pages_id)
            .merge_context("Failed to get pages object")?;

        let kids = dict
            .get_mut(b"Kids")
            .map_err(|_| StitchError::merge_failed("Pages dictionary missing Kids array"))?;

        if let Object::Array(kids_array) = kids {
            kids_array.extend(page_ids.iter().map(|&id| Object::Reference(id)));
        } else {
            return Err(StitchError::merge_failed("Kids is not an array"));
        }

        let current_count = dict.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
        dict.set("Count", Object::Integer(current_count + page_ids.len() as i64));

        Ok(())
    }
}

impl Default for Merger {
    fn default() -> Self {
        Self::new()
    }
}

/// Object id of the document's root `Pages` node.
fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .merge_context("Failed to get catalog")?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .merge_context("Failed to get pages reference")
}

/// Push the root node's inheritable attributes down onto the base document's
/// own pages, so pages appended under that root inherit nothing from it.
fn detach_root_attributes(doc: &mut Document, pages_id: ObjectId) -> Result<()> {
    for page_id in doc.get_pages().into_values() {
        flatten_inherited_attributes(doc, page_id)?;
    }

    let root = doc
        .get_dictionary_mut(pages_id)
        .merge_context("Failed to get pages object")?;
    for key in INHERITABLE_KEYS {
        root.remove(key);
    }

    Ok(())
}

/// Copy attributes a page inherits from its ancestors onto the page itself,
/// so it renders the same once re-parented under another tree.
fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc
        .get_dictionary(page_id)
        .merge_context("Failed to get page")?;

    let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if !inherited.is_empty() {
        let page = doc
            .get_dictionary_mut(page_id)
            .merge_context("Failed to get page")?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    Ok(())
}
