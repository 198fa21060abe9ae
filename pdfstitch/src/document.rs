//! Request payloads and produced artifacts.

use std::time::Duration;

use crate::utils::format_file_size;

/// A named PDF payload supplied by the caller.
///
/// The name identifies the document within one request and is what an
/// [`OrderSpecification`](crate::merge::OrderSpecification) refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    name: String,
    bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Create a new upload from a name and its raw bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Identifier of this upload.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A named output payload ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name the artifact is delivered under.
    pub file_name: String,

    /// Serialized PDF.
    pub bytes: Vec<u8>,

    /// Number of pages in the serialized document.
    pub page_count: usize,
}

impl Artifact {
    /// Payload size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Format the payload size as a human-readable string.
    pub fn format_size(&self) -> String {
        format_file_size(self.size())
    }
}

/// Where an output page came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageOrigin {
    /// Name of the source upload.
    pub document: String,

    /// 1-indexed page number within the source upload.
    pub page: usize,
}

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of documents concatenated.
    pub documents_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Total size of the uploaded payloads.
    pub input_size: u64,

    /// Time spent parsing, concatenating and serializing.
    pub merge_time: Duration,

    /// Whether stream compression was applied.
    pub compressed: bool,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }
}

/// The single output of a successful merge.
///
/// Immutable once built: pages appear in the order the caller chose, and
/// [`pages`](Self::pages) records the source of each one.
#[derive(Debug, Clone)]
pub struct MergedArtifact {
    artifact: Artifact,
    pages: Vec<PageOrigin>,
    statistics: MergeStatistics,
}

impl MergedArtifact {
    pub(crate) fn new(
        artifact: Artifact,
        pages: Vec<PageOrigin>,
        statistics: MergeStatistics,
    ) -> Self {
        Self {
            artifact,
            pages,
            statistics,
        }
    }

    /// Delivery name (`merged.pdf`).
    pub fn file_name(&self) -> &str {
        &self.artifact.file_name
    }

    /// Serialized PDF.
    pub fn bytes(&self) -> &[u8] {
        &self.artifact.bytes
    }

    /// Number of pages in the output.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Source of every output page, in output order.
    pub fn pages(&self) -> &[PageOrigin] {
        &self.pages
    }

    /// Statistics gathered while merging.
    pub fn statistics(&self) -> &MergeStatistics {
        &self.statistics
    }

    /// Borrow the underlying artifact for delivery.
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// Consume the merge result, keeping only the deliverable.
    pub fn into_artifact(self) -> Artifact {
        self.artifact
    }
}
