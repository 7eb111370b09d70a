//! Text extractor port - turning uploaded file bytes into analyzable text.
//!
//! Implementations decide how to decode a particular format. Binary
//! formats the implementation cannot decode are reported as a textual
//! notice rather than an error, so the rest of the pipeline can still
//! produce a template summary for them.

use thiserror::Error;

/// Port for document-to-text conversion.
pub trait TextExtractor: Send + Sync {
    /// Extracts analyzable text from a file's bytes.
    ///
    /// Undecodable binary content is not an error here; implementations
    /// return a binary-content notice instead so callers can degrade
    /// gracefully.
    fn extract(&self, file_name: &str, bytes: &[u8]) -> Result<String, TextExtractionError>;
}

/// Text extraction errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextExtractionError {
    /// The file had no content at all.
    #[error("file `{file_name}` is empty")]
    Empty {
        /// Offending file.
        file_name: String,
    },
}
