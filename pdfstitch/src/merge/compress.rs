//! Output size reduction.

use lopdf::Document;
use tracing::info;

use crate::config::CompressionLevel;
use crate::document::{Artifact, UploadedDocument};
use crate::error::Result;
use crate::request::Action;
use crate::utils::{parse_document, serialize_document};

/// Apply `level` to a document in place.
pub(crate) fn optimize(doc: &mut Document, level: CompressionLevel) {
    match level {
        CompressionLevel::None => {}
        CompressionLevel::Standard => {
            doc.compress();
        }
        CompressionLevel::Maximum => {
            doc.prune_objects();
            doc.compress();
        }
    }
}

/// Rewrites a single document with maximum compression.
#[derive(Debug, Clone, Default)]
pub struct Compressor;

impl Compressor {
    /// Create a new compressor.
    pub fn new() -> Self {
        Self
    }

    /// Compress `upload`, keeping all of its pages.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if the payload cannot be parsed.
    pub fn compress(&self, upload: &UploadedDocument) -> Result<Artifact> {
        let mut doc = parse_document(upload.name(), upload.bytes())?;

        optimize(&mut doc, CompressionLevel::Maximum);
        doc.renumber_objects();

        let page_count = doc.get_pages().len();
        let bytes = serialize_document(&mut doc)?;

        info!(
            document = upload.name(),
            input_bytes = upload.size(),
            output_bytes = bytes.len(),
            "compressed document"
        );

        Ok(Artifact {
            file_name: Action::Compress.default_output().to_string(),
            bytes,
            page_count,
        })
    }
}
