//! Error types for pdfsift.

use std::io;
use thiserror::Error;

/// Result type alias for pdfsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction and ranking.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error reading PDF structure or content streams.
    ///
    /// Per-document: the batch skips the document and continues.
    #[error("PDF parsing error: {0}")]
    Parse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// The document yielded no extractable text.
    #[error("No extractable text in document")]
    EmptyDocument,

    /// Missing or malformed run configuration (persona/job descriptor).
    ///
    /// Per-run: aborts before any document is processed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The embedding model could not be loaded.
    ///
    /// Fatal for ranking; outline extraction has no model dependency.
    #[error("Embedding model load failed: {0}")]
    ModelLoad(String),

    /// Error from the embedding model at inference time.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Error producing output records.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Parse(err.to_string()),
        }
    }
}
