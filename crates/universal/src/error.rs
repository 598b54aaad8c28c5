//! Error surface of the universal feature extractor.

use thiserror::Error;

/// Failures while reducing a file to its feature record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UniversalError {
    /// The file could not be read or stat-ed.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The file claimed to be an image but did not decode.
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// Feature serialization failed (histogram or metadata JSON).
    #[error("failed to serialize features: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A PDF was offered but no [`crate::PdfInspector`] is configured.
    #[error("no PDF inspector configured; PDF feature extraction is delegated")]
    PdfUnavailable,

    /// The PDF inspector failed to produce a report.
    #[error("PDF inspection failed: {0}")]
    Pdf(String),
}
