//! Dokid Universal Layer - Format-Sensitive File Identifiers
//!
//! The business identifier (the `canonical` crate) answers "is this the same
//! economic act". This crate answers a different question: "is this the same
//! *file*, give or take a re-encoding". It reduces a raw file to a fixed
//! feature record — content hash, perceptual visual hash, text hash,
//! metadata hash, dimensions, timestamps — and hashes the record into a
//! short identifier used for exact-file deduplication.
//!
//! ## Feature extraction by file kind
//!
//! - **PDF** — per-page structure counts and text lengths, the metadata
//!   dictionary, and a render of the first page. Page rasterization and
//!   object enumeration live outside this workspace; callers supply them
//!   through the [`PdfInspector`] trait.
//! - **Raster images** — decoded in-crate with the `image` crate: RGB
//!   conversion, perceptual visual hash, color histogram hash.
//! - **Anything else** — SHA-256 over the raw bytes.
//!
//! ## The perceptual visual hash
//!
//! Grayscale → white square pad → 32×32 Lanczos resize → mean threshold →
//! 1024-bit signature → hex → SHA-256, first 16 hex characters. It is tuned
//! to survive re-encoding between PNG and JPEG at comparable quality and
//! small resampling — not cropping or rotation. That limitation is
//! deliberate: the universal identifier is a deduplication aid, not a
//! semantic equivalence oracle.
//!
//! ## Canonical feature order
//!
//! The `|`-joined feature order in [`FileFeatures::canonical_string`] is
//! wire contract and must never be reordered; missing features appear as
//! empty segments.

mod error;
mod features;
mod generic;
mod id;
mod img;
mod pdf;
mod visual;

pub use crate::error::UniversalError;
pub use crate::features::{Dimensions, FileFeatures};
pub use crate::generic::generic_features;
pub use crate::id::{
    parse_universal_id, FeatureComparison, ParsedUniversalId, UniversalExtractor,
};
pub use crate::img::image_features;
pub use crate::pdf::{pdf_features, PdfInspector, PdfPage, PdfReport};
pub use crate::visual::visual_hash;

/// First sixteen lowercase hex characters of SHA-256 over the input.
pub(crate) fn short_hash(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(bytes);
    hex::encode(digest)[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_is_stable_and_short() {
        assert_eq!(short_hash(b"abc"), short_hash(b"abc"));
        assert_ne!(short_hash(b"abc"), short_hash(b"abd"));
        assert_eq!(short_hash(b"abc").len(), 16);
    }
}
