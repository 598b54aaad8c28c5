//! Workspace umbrella crate for dokid.
//!
//! Dokid assigns a deterministic, content-based identifier to a Polish
//! business document — invoice, fiscal receipt, contract, bank statement,
//! cash voucher, and friends — such that every faithful rendering of the
//! same economic act (a scan, a PDF, an XML export, a plain-text
//! transcription) resolves to the same identifier.
//!
//! The `dokid` crate re-exports the canonical, evidence, extraction, and
//! universal layers so applications can drive the full pipeline through a
//! single dependency, and adds the orchestration itself: [`Pipeline`]
//! dispatches on file kind, merges multi-page evidence, classifies,
//! extracts, builds the canonical string, derives the identifier, and
//! annotates duplicates.
//!
//! ## Quick start
//!
//! ```no_run
//! use dokid::{Pipeline, PipelineConfig, TextRecognizer};
//! # fn engine() -> Box<dyn TextRecognizer> { unimplemented!() }
//!
//! # fn demo() -> Result<(), dokid::PipelineError> {
//! let pipeline = Pipeline::new(PipelineConfig::default(), engine())?;
//!
//! let result = pipeline.process("faktura.txt".as_ref())?;
//! println!("{}", result.document_id);          // DOC-FV-A7B3C9D2E1F04856
//! println!("{}", result.canonical_string);     // 5213017228|FV/2025/00142|...
//!
//! let matches = pipeline.verify("skan_faktury.txt".as_ref(), result.document_id.as_str())?;
//! assert!(matches);
//! # Ok(())
//! # }
//! ```
//!
//! ## Two identifiers, two questions
//!
//! The **business identifier** ([`DocumentIdBuilder`], produced by
//! [`Pipeline::process`]) canonicalizes the identifying fields, so it is
//! stable across formats, OCR noise, locale formatting, and party order.
//! The **universal identifier** ([`UniversalExtractor`]) hashes raw file
//! features — perceptual visual hash included — and is deliberately
//! format-sensitive: it answers "same file", not "same document".
//!
//! ## Collaborator seams
//!
//! OCR engines implement [`TextRecognizer`]; PDF parsing and rasterization
//! implement [`universal::PdfInspector`]. Both stay outside this workspace;
//! the pipeline only constrains the data they must deliver.
//!
//! ## Determinism
//!
//! Given identical [`TextEvidence`], the identifier is independent of
//! clock, scheduling, process identity, and previous inputs. The only
//! pipeline-scoped mutable state is the advisory duplicate cache, which is
//! mutex-serialized and never alters an identifier.

mod config;
mod error;
mod ocr;
mod pipeline;

pub use crate::config::{ConfigError, PipelineConfig};
pub use crate::error::PipelineError;
pub use crate::ocr::{OcrError, TextRecognizer};
pub use crate::pipeline::{BatchOutcome, Pipeline, ProcessedDocument};

pub use canonical::{
    normalize, parse_document_id, DocumentId, DocumentIdBuilder, DocumentKind, IdParseError,
    ParsedId,
};
pub use evidence::{EvidenceLine, TextEvidence};
pub use extract::{
    Classifier, ContractExtractor, DocumentCategory, ExtractionResult, FieldExtractor,
    InvoiceExtractor, ReceiptExtractor, CONFIDENCE_THRESHOLD,
};
pub use universal::{
    parse_universal_id, Dimensions, FeatureComparison, FileFeatures, ParsedUniversalId,
    PdfInspector, PdfPage, PdfReport, UniversalError, UniversalExtractor,
};
