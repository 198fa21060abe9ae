//! Loading uploads from disk.
//!
//! Each file becomes an [`UploadedDocument`] named after its file name.
//! Loading does not parse the PDF; parse errors surface when a request is
//! processed, tagged with the upload's name.
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::reader::UploadReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = UploadReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (results, stats) = reader.load_all(&paths, 4).await;
//! println!("Loaded {} of {} files", stats.success_count, results.len());
//! # Ok(())
//! # }
//! ```

use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::document::UploadedDocument;
use crate::error::{Result, StitchError};
use crate::utils::format_file_size;

/// An upload read from disk.
#[derive(Debug, Clone)]
pub struct LoadedUpload {
    /// The upload itself.
    pub upload: UploadedDocument,

    /// Path the upload was read from.
    pub path: PathBuf,

    /// Time taken to read the file.
    pub load_time: Duration,
}

/// Result of a load operation (success or failure).
pub type LoadResult = Result<LoadedUpload>;

/// Statistics for a batch load operation.
#[derive(Debug, Clone)]
pub struct LoadStatistics {
    /// Number of files successfully read.
    pub success_count: usize,

    /// Number of files that failed to read.
    pub failure_count: usize,

    /// Total time taken for all loads.
    pub total_time: Duration,

    /// Total size of successfully read files.
    pub total_size: u64,
}

impl LoadStatistics {
    /// Create statistics from load results.
    fn from_results(results: &[LoadResult], total_time: Duration) -> Self {
        let mut success_count = 0;
        let mut failure_count = 0;
        let mut total_size = 0;

        for result in results {
            match result {
                Ok(loaded) => {
                    success_count += 1;
                    total_size += loaded.upload.size();
                }
                Err(_) => failure_count += 1,
            }
        }

        Self {
            success_count,
            failure_count,
            total_time,
            total_size,
        }
    }

    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Reads uploads from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct UploadReader;

impl UploadReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a single file into an upload named after the file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist (`FileNotFound`)
    /// - The path is a directory (`NotAFile`)
    /// - The file cannot be read (`FailedToReadUpload`)
    pub async fn load(&self, path: &Path) -> Result<LoadedUpload> {
        let start = Instant::now();

        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StitchError::file_not_found(path.to_path_buf())
            } else {
                StitchError::FailedToReadUpload {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        if !metadata.is_file() {
            return Err(StitchError::not_a_file(path.to_path_buf()));
        }

        let bytes =
            tokio::fs::read(path)
                .await
                .map_err(|e| StitchError::FailedToReadUpload {
                    path: path.to_path_buf(),
                    source: e,
                })?;

        let name = upload_name(path);
        debug!(path = %path.display(), name = %name, bytes = bytes.len(), "read upload");

        Ok(LoadedUpload {
            upload: UploadedDocument::new(name, bytes),
            path: path.to_path_buf(),
            load_time: start.elapsed(),
        })
    }

    /// Read several files with at most `workers` reads in flight.
    ///
    /// Results are returned in the same order as `paths`.
    pub async fn load_all(
        &self,
        paths: &[PathBuf],
        workers: usize,
    ) -> (Vec<LoadResult>, LoadStatistics) {
        let start = Instant::now();
        let workers = workers.max(1);

        let tasks = paths.iter().map(|path| async move { self.load(path).await });

        let results: Vec<LoadResult> = stream::iter(tasks).buffered(workers).collect().await;

        let stats = LoadStatistics::from_results(&results, start.elapsed());
        (results, stats)
    }

    /// Read every file or fail on the first error.
    ///
    /// # Errors
    ///
    /// Returns the first failure in input order.
    pub async fn load_uploads(
        &self,
        paths: &[PathBuf],
        workers: usize,
    ) -> Result<Vec<UploadedDocument>> {
        let (results, _stats) = self.load_all(paths, workers).await;
        results
            .into_iter()
            .map(|result| result.map(|loaded| loaded.upload))
            .collect()
    }
}

/// Identifier for an upload read from `path`: its file name.
fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
