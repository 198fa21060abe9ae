//! Error types for pdfstitch.
//!
//! Every fallible operation in the crate returns [`StitchError`]. The three
//! request-level failures a caller is expected to act on are:
//!
//! - **Validation**: the order does not match the uploaded set, the batch is
//!   empty, or names collide.
//! - **CountExceeded**: more documents were uploaded than the batch limit.
//! - **MalformedInput**: a payload could not be parsed as a PDF.
//!
//! The remaining variants cover file access and output delivery. None of
//! them are retried; the request has to be resubmitted with corrected input.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfstitch operations.
pub type Result<T> = std::result::Result<T, StitchError>;

/// Main error type for pdfstitch operations.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    /// The order specification and the uploaded documents disagree, or the
    /// request is otherwise incomplete.
    #[error("Validation failed: {reason}")]
    Validation {
        /// What did not match.
        reason: String,
    },

    /// More documents were uploaded than the batch allows.
    #[error("Too many documents: {count} uploaded, at most {limit} allowed")]
    CountExceeded {
        /// Number of uploaded documents.
        count: usize,
        /// Configured batch limit.
        limit: usize,
    },

    /// An uploaded payload is not a readable PDF.
    #[error("Malformed document '{name}'\n  Reason: {reason}")]
    MalformedInput {
        /// Identifier of the offending upload.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// An uploaded payload is encrypted.
    #[error(
        "Document '{name}' is encrypted and cannot be processed\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedInput {
        /// Identifier of the encrypted upload.
        name: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// Input file exists but could not be read.
    #[error("Failed to read upload: {}\n  Reason: {source}", path.display())]
    FailedToReadUpload {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output.
        path: PathBuf,
    },

    /// Failed to create the output file or directory.
    #[error("Failed to create output: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write the output file.
    #[error("Failed to write output: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The document tree could not be assembled or serialized.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// User declined to continue.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for StitchError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

/// Attach a description to low-level PDF errors raised while the output
/// document is being assembled.
pub(crate) trait PdfResultExt<T> {
    fn merge_context(self, what: &str) -> Result<T>;
}

impl<T> PdfResultExt<T> for std::result::Result<T, lopdf::Error> {
    fn merge_context(self, what: &str) -> Result<T> {
        self.map_err(|e| StitchError::merge_failed(format!("{what}: {e}")))
    }
}

impl StitchError {
    /// Create a Validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Create a MalformedInput error.
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedInput error.
    pub fn encrypted(name: impl Into<String>) -> Self {
        Self::EncryptedInput { name: name.into() }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Whether the request itself was rejected (as opposed to an I/O or
    /// delivery failure). Rejected requests must be resubmitted with
    /// corrected input.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::CountExceeded { .. }
                | Self::MalformedInput { .. }
                | Self::EncryptedInput { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. } => 1,
            Self::CountExceeded { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Other { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadUpload { .. } => 2,
            Self::MalformedInput { .. } => 3,
            Self::EncryptedInput { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::MergeFailed { .. } => 6,
            Self::Cancelled => 130, // SIGINT
        }
    }
}
