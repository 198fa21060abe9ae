//! Utilities for path collection, size formatting and PDF loading.

use crate::{Result, error::StitchError};
use lopdf::Document;
use std::path::PathBuf;

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// A pattern without glob metacharacters that matches nothing is passed
/// through unchanged, so a missing file surfaces later as `FileNotFound`
/// instead of silently disappearing.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let pattern = pattern.as_ref();
        let paths = collect_paths_for_pattern(pattern)?;

        if paths.is_empty() && !is_glob(pattern) {
            resolved_paths.push(PathBuf::from(pattern));
        } else {
            resolved_paths.extend(paths);
        }
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern).map_err(|err| StitchError::invalid_config(err.to_string()))?;

    for entry in paths {
        let path = entry.map_err(|err| StitchError::other(err.to_string()))?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Parse an upload's payload into a document.
///
/// Parser failures become `MalformedInput` tagged with the upload's name.
/// Any payload with an `/Encrypt` entry is refused as `EncryptedInput`,
/// since lopdf loads such files even when it cannot decrypt them.
pub fn parse_document(name: &str, bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| {
        let err_msg = e.to_string();
        if err_msg.contains("encrypt") || err_msg.contains("password") {
            StitchError::encrypted(name)
        } else {
            StitchError::malformed(name, err_msg)
        }
    })?;

    if doc.trailer.has(b"Encrypt") {
        return Err(StitchError::encrypted(name));
    }

    Ok(doc)
}

/// Serialize a document into an in-memory buffer.
pub fn serialize_document(doc: &mut Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| StitchError::merge_failed(format!("Failed to serialize PDF: {e}")))?;
    Ok(buffer)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
