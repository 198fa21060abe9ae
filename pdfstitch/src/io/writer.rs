//! Delivering artifacts to disk.
//!
//! Writes are atomic: bytes go to a temporary file in the
//! destination directory which is then renamed over the target. A failed
//! write never leaves a partial file or a stray temporary behind.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::document::Artifact;
//! use pdfstitch::io::writer::ArtifactWriter;
//! use std::path::Path;
//!
//! # async fn example(artifact: Artifact) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = ArtifactWriter::new();
//! let stats = writer.save(&artifact, Path::new("merged.pdf")).await?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tokio::task;
use tracing::debug;

use crate::document::Artifact;
use crate::error::{Result, StitchError};
use crate::utils::format_file_size;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes artifacts to the filesystem.
#[derive(Debug, Clone, Default)]
pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Write `artifact` to `path`, replacing any existing file.
    ///
    /// Overwrite policy is the caller's concern; see
    /// [`OverwriteMode`](crate::config::OverwriteMode).
    ///
    /// # Errors
    ///
    /// Returns `FailedToCreateOutput` if the destination cannot be created
    /// and `FailedToWrite` if writing or renaming fails.
    pub async fn save(&self, artifact: &Artifact, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let bytes = artifact.bytes.clone();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();
            write_atomic(&path_buf, &bytes)?;

            Ok::<_, StitchError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| StitchError::other(format!("Write task failed: {e}")))??;

        debug!(
            path = %stats.output_path.display(),
            bytes = stats.file_size,
            "wrote artifact"
        );

        Ok(stats)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = parent_dir(path);

    let mut temp =
        NamedTempFile::new_in(&parent).map_err(|e| StitchError::FailedToCreateOutput {
            path: path.to_path_buf(),
            source: e,
        })?;

    temp.write_all(bytes)
        .and_then(|()| temp.flush())
        .map_err(|e| StitchError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

    // Dropping `temp` on any error above removes the temporary file.
    temp.persist(path).map_err(|e| StitchError::FailedToWrite {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
