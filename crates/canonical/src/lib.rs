//! Dokid Canonical Layer - Deterministic Field Canonicalization
//!
//! This crate is the leaf of the dokid pipeline. It turns the messy surface
//! forms found on Polish business documents (tax identifiers, monetary
//! amounts, dates, document numbers) into exactly one canonical form each,
//! assembles the canonical forms into a kind-ordered `|`-separated canonical
//! string, and derives the short content identifier from it.
//!
//! # Core Guarantee
//!
//! > **Same business fields → identical canonical string → identical
//! > identifier, forever.**
//!
//! This crate is **pure** and **side-effect free**:
//! - No I/O operations
//! - No network calls
//! - No dependence on wall-clock time, locale, or hardware
//!
//! # Pipeline Position
//!
//! ```text
//! TextEvidence ──▶ Extract ──▶ Normalize ──▶ Canonical String ──▶ DocumentId
//!                                  ↑                  ↑
//!                              (this crate)      (this crate)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use canonical::{DocumentIdBuilder, normalize};
//!
//! assert_eq!(normalize::tax_id("521-301-72-28"), "5213017228");
//! assert_eq!(normalize::amount("1 230,50 zł"), "1230.50");
//! assert_eq!(normalize::date("15.01.2025"), "2025-01-15");
//!
//! let builder = DocumentIdBuilder::default();
//! let id = builder.invoice("521-301-72-28", "fv/2025/00142", "15.01.2025", "1 230,50 zł");
//! assert!(id.as_str().starts_with("DOC-FV-"));
//! ```
//!
//! # Normalizer Contract
//!
//! Every normalizer is total and idempotent: it never fails (malformed input
//! maps to the canonical empty form, `"0.00"` for amounts) and applying it to
//! its own output is the identity. The idempotence property is what lets the
//! extraction layer pre-fold values without affecting the final identifier.
//!
//! # Identifier Wire Format
//!
//! `<prefix>-<kind-code>-<hash16>` where `hash16` is the first sixteen
//! uppercase hex characters of SHA-256 over the canonical string's UTF-8
//! bytes. The kind codes (see [`DocumentKind`]) are part of the public wire
//! contract; changing one is a breaking change.

mod builder;
mod kind;
pub mod normalize;

pub use crate::builder::{
    parse_document_id, DocumentId, DocumentIdBuilder, IdParseError, ParsedId,
};
pub use crate::kind::DocumentKind;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_identifier_matches_reference_vector() {
        let builder = DocumentIdBuilder::default();
        let id = builder.invoice("5213017228", "FV/2025/00142", "2025-01-15", "1230.50");

        let canonical = builder.invoice_canonical("5213017228", "FV/2025/00142", "2025-01-15", "1230.50");
        assert_eq!(canonical, "5213017228|FV/2025/00142|2025-01-15|1230.50");
        assert!(builder.verify(id.as_str(), &canonical));
    }

    #[test]
    fn surface_form_variations_collapse() {
        let builder = DocumentIdBuilder::default();
        let tidy = builder.invoice("5213017228", "FV/2025/00142", "2025-01-15", "1230.50");
        let messy = builder.invoice("521-301-72-28", "fv/2025/00142", "15.01.2025", "1 230,50 zł");
        assert_eq!(tidy, messy);
    }

    #[test]
    fn contract_party_order_is_irrelevant() {
        let builder = DocumentIdBuilder::default();
        let ab = builder.contract("5213017228", "9876543210", "2025-01-15", None, None);
        let ba = builder.contract("9876543210", "5213017228", "2025-01-15", None, None);
        assert_eq!(ab, ba);
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(DocumentKind::from_code("??"), None);
    }
}
