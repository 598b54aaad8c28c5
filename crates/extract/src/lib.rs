//! Dokid Extraction Layer
//!
//! Recovers the small set of identifying fields from noisy document text.
//! One extractor per document kind, each with two operations:
//!
//! - `can_extract(&TextEvidence) -> (bool, f32)` — scores how well the
//!   evidence fits the kind by counting kind-specific keywords and
//!   structural cues (presence of tax ids, amounts, document numbers).
//!   Acceptance requires a confidence above [`CONFIDENCE_THRESHOLD`].
//! - `extract(&TextEvidence) -> ExtractionResult` — pulls the kind's
//!   fields with keyword-anchored, case-insensitive patterns, falling back
//!   to the pre-scanned candidate lists.
//!
//! The [`Classifier`] runs every scorer and hands the evidence to the
//! winner; when nothing clears the threshold the document is left
//! unclassified and only the shared fields (first tax id, first date) are
//! lifted.
//!
//! Extractors pre-fold dates and amounts into their canonical shapes. The
//! canonical-layer normalizers are idempotent, so this folding can never
//! change the final identifier; it exists so that confidence decisions (for
//! example "largest detected amount") compare like with like.

mod classifier;
mod contract;
mod invoice;
mod receipt;
mod result;
mod util;

pub use crate::classifier::{Classifier, CONFIDENCE_THRESHOLD};
pub use crate::contract::ContractExtractor;
pub use crate::invoice::InvoiceExtractor;
pub use crate::receipt::ReceiptExtractor;
pub use crate::result::{DocumentCategory, ExtractionResult};

use evidence::TextEvidence;

/// Uniform interface over the per-kind extractors.
pub trait FieldExtractor: Send + Sync {
    /// The category this extractor produces.
    fn category(&self) -> DocumentCategory;

    /// Score the evidence: `(accepted, confidence)`.
    fn can_extract(&self, evidence: &TextEvidence) -> (bool, f32);

    /// Pull the kind-specific fields.
    fn extract(&self, evidence: &TextEvidence) -> ExtractionResult;
}
