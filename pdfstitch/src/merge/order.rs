//! Caller-chosen document order.
//!
//! An [`OrderSpecification`] is a sequence of upload names that must be a
//! permutation of the uploaded set: same length, every name known, no name
//! repeated, none omitted.

use std::collections::{HashMap, HashSet};

use crate::document::UploadedDocument;
use crate::error::{Result, StitchError};

/// Ordered list of upload names determining concatenation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpecification {
    names: Vec<String>,
}

impl OrderSpecification {
    /// Create an order from names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// The order the documents were uploaded in.
    pub fn upload_order(documents: &[UploadedDocument]) -> Self {
        Self::new(documents.iter().map(|doc| doc.name()))
    }

    /// Parse a list of names, one per line.
    ///
    /// Surrounding whitespace and blank lines are ignored; lines starting
    /// with `#` are comments. Commas are part of the name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfstitch::merge::OrderSpecification;
    ///
    /// let order = OrderSpecification::parse_list("b.pdf\n# skip\nnotes, draft.pdf\n");
    /// assert_eq!(order.names(), ["b.pdf", "notes, draft.pdf"]);
    /// ```
    pub fn parse_list(list: &str) -> Self {
        Self::new(
            list.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names were given.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve this order against the uploaded documents.
    ///
    /// Returns, for each position in the order, the index of the matching
    /// upload in `documents`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if:
    /// - Two uploads share a name
    /// - The order has a different length than the upload set
    /// - The order repeats a name
    /// - The order names an unknown upload
    /// - The order omits an upload
    pub fn resolve(&self, documents: &[UploadedDocument]) -> Result<Vec<usize>> {
        let mut index_by_name: HashMap<&str, usize> = HashMap::with_capacity(documents.len());
        for (idx, doc) in documents.iter().enumerate() {
            if index_by_name.insert(doc.name(), idx).is_some() {
                return Err(StitchError::validation(format!(
                    "Two uploaded documents are named '{}'",
                    doc.name()
                )));
            }
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(self.names.len());
        let mut indices = Vec::with_capacity(self.names.len());

        for name in &self.names {
            let idx = index_by_name.get(name.as_str()).copied().ok_or_else(|| {
                StitchError::validation(format!("Order names unknown document '{name}'"))
            })?;

            if !seen.insert(name.as_str()) {
                return Err(StitchError::validation(format!(
                    "Order lists '{name}' more than once"
                )));
            }

            indices.push(idx);
        }

        if self.names.len() != documents.len() {
            let missing: Vec<&str> = documents
                .iter()
                .map(|doc| doc.name())
                .filter(|name| !seen.contains(name))
                .collect();

            return Err(StitchError::validation(format!(
                "Order lists {} of {} document(s); missing: {}",
                self.names.len(),
                documents.len(),
                missing.join(", ")
            )));
        }

        Ok(indices)
    }
}

impl<S: Into<String>> FromIterator<S> for OrderSpecification {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
