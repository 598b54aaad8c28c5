//! Dokid Evidence Layer
//!
//! This is where document text enters the pipeline. The OCR collaborator (or
//! a plain-text reader) produces a [`TextEvidence`]: the full recognized
//! text, per-line confidences, and pre-scanned candidate lists for the four
//! structured token kinds the extractors care about — tax identifiers,
//! monetary amounts, dates, and document numbers.
//!
//! ## What we do here
//!
//! - **Model the acquisition contract** — [`TextEvidence`] and
//!   [`EvidenceLine`] are the shape every upstream source must deliver.
//! - **Scan for structured tokens** — the [`scan`] module recovers
//!   candidates from raw text with compiled-once patterns. Tax-id
//!   candidates are gated by the NIP checksum so OCR noise doesn't flood
//!   the extractors.
//! - **Merge pages** — multi-page sources collapse into one evidence record
//!   with `\n\n`-joined text, first-occurrence-preserving token unions, and
//!   the mean page confidence.
//!
//! The detected lists are *candidates*: extractors may accept, reject, or
//! reorder them. Insertion order is document order, and the first occurrence
//! wins when the same token appears twice — downstream logic relies on this
//! to pick the issuer's tax id.

pub mod scan;
mod types;

pub use crate::types::{EvidenceLine, TextEvidence};
