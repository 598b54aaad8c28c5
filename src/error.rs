//! Unified error surface of the pipeline.

use thiserror::Error;

use crate::config::ConfigError;
use crate::ocr::OcrError;
use universal::UniversalError;

/// Everything that can go wrong while processing a document.
///
/// Boundary failures (unreadable file, unsupported extension, empty PDF)
/// surface immediately; the pipeline never fabricates a canonical string
/// for them and never records them in the duplicate cache.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// The file extension maps to no known acquisition route.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The recognizer returned zero pages.
    #[error("no pages recognized in {0}")]
    EmptyDocument(String),

    /// A text-format file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The OCR collaborator failed.
    #[error(transparent)]
    Ocr(#[from] OcrError),

    /// Universal feature extraction failed.
    #[error(transparent)]
    Universal(#[from] UniversalError),

    /// The pipeline configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
