//! Incremental merge requests.
//!
//! A [`MergeSession`] is the `Collecting` state: uploads arrive and an order
//! may be chosen. [`MergeSession::merge`] consumes the session, which is the
//! transition to the terminal `Merged` state; the session cannot be reused
//! whether the merge succeeded or failed.

use crate::document::{MergedArtifact, UploadedDocument};
use crate::error::Result;
use crate::merge::merger::Merger;
use crate::merge::order::OrderSpecification;

/// Collects uploads and an order, then merges once.
#[derive(Debug, Clone, Default)]
pub struct MergeSession {
    merger: Merger,
    documents: Vec<UploadedDocument>,
    order: Option<OrderSpecification>,
}

impl MergeSession {
    /// Start an empty session with a default [`Merger`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty session that merges with `merger`.
    pub fn with_merger(merger: Merger) -> Self {
        Self {
            merger,
            ..Self::default()
        }
    }

    /// Add one upload.
    pub fn add(&mut self, document: UploadedDocument) -> &mut Self {
        self.documents.push(document);
        self
    }

    /// Add several uploads, preserving their order.
    pub fn add_all(&mut self, documents: impl IntoIterator<Item = UploadedDocument>) -> &mut Self {
        self.documents.extend(documents);
        self
    }

    /// Choose the concatenation order.
    ///
    /// Replaces any previously chosen order. If no order is chosen, uploads
    /// are merged in the order they were added.
    pub fn set_order<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(OrderSpecification::new(names));
        self
    }

    /// Uploads collected so far.
    pub fn documents(&self) -> &[UploadedDocument] {
        &self.documents
    }

    /// The order that [`merge`](Self::merge) will use.
    pub fn effective_order(&self) -> OrderSpecification {
        self.order
            .clone()
            .unwrap_or_else(|| OrderSpecification::upload_order(&self.documents))
    }

    /// Merge the collected uploads. Consumes the session.
    ///
    /// # Errors
    ///
    /// See [`Merger::merge`].
    pub fn merge(self) -> Result<MergedArtifact> {
        let order = self.effective_order();
        self.merger.merge(&self.documents, &order)
    }
}
