//! The text-acquisition seam.
//!
//! OCR engines are external collaborators. The pipeline only fixes the data
//! they must deliver: one [`TextEvidence`] per page, with per-line
//! confidences and the pre-scanned candidate token lists in document order.

use std::path::Path;

use thiserror::Error;

use evidence::TextEvidence;

/// Failures reported by a text-recognition collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OcrError {
    /// The engine is not installed or failed to initialize.
    #[error("ocr engine unavailable: {0}")]
    Unavailable(String),
    /// Recognition ran and failed.
    #[error("recognition failed: {0}")]
    Recognition(String),
    /// The input file could not be read or rasterized.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Implemented by OCR engines (and by test stubs).
///
/// For single-page inputs the returned vector has one element; for PDFs it
/// has one element per page, in page order. An empty vector means the file
/// had no recognizable pages and the pipeline surfaces it as an error.
///
/// A call that fails must leave no side effects: the pipeline guarantees
/// that a failed file never populates the duplicate cache.
pub trait TextRecognizer: Send + Sync {
    /// Recognize every page of the file at `path`.
    fn recognize(&self, path: &Path) -> Result<Vec<TextEvidence>, OcrError>;
}
