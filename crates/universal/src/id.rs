//! The universal (format-sensitive) identifier.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::features::FileFeatures;
use crate::pdf::PdfInspector;
use crate::{generic_features, image_features, pdf_features, UniversalError};

/// Extensions handled by the raster-image feature extractor.
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// Components of a parsed universal identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUniversalId {
    pub prefix: String,
    pub kind_code: String,
    pub hash: String,
}

/// Split a universal identifier into `prefix-kind-hash`, or `None` when the
/// structure is wrong.
pub fn parse_universal_id(id: &str) -> Option<ParsedUniversalId> {
    let parts: Vec<&str> = id.split('-').collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(ParsedUniversalId {
        prefix: parts[0].to_string(),
        kind_code: parts[1].to_string(),
        hash: parts[2].to_string(),
    })
}

/// Field-by-field comparison of two files' features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureComparison {
    pub identical_ids: bool,
    pub id_a: String,
    pub id_b: String,
    pub same_kind: bool,
    pub same_size: bool,
    pub same_content_hash: bool,
    /// Only present when both files produced a visual hash.
    pub same_visual_hash: Option<bool>,
    /// Only present when both files produced a text hash.
    pub same_text_hash: Option<bool>,
}

/// Computes file features and universal identifiers.
///
/// PDF support is optional: without an inspector every `.pdf` is refused
/// with [`UniversalError::PdfUnavailable`]. Images decode in-crate and
/// everything else falls back to a raw byte hash.
pub struct UniversalExtractor {
    prefix: String,
    pdf: Option<Box<dyn PdfInspector>>,
}

impl Default for UniversalExtractor {
    fn default() -> Self {
        UniversalExtractor {
            prefix: "UNIV".to_string(),
            pdf: None,
        }
    }
}

impl UniversalExtractor {
    /// Extractor with a custom identifier prefix.
    pub fn new(prefix: impl Into<String>) -> UniversalExtractor {
        UniversalExtractor {
            prefix: prefix.into(),
            pdf: None,
        }
    }

    /// Attach a PDF collaborator.
    pub fn with_pdf_inspector(mut self, inspector: Box<dyn PdfInspector>) -> UniversalExtractor {
        self.pdf = Some(inspector);
        self
    }

    /// Reduce a file to its feature record, dispatching on the extension.
    pub fn features(&self, path: &Path) -> Result<FileFeatures, UniversalError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let features = if extension == "pdf" {
            let inspector = self.pdf.as_ref().ok_or(UniversalError::PdfUnavailable)?;
            let report = inspector.inspect(path)?;
            pdf_features(path, &report)?
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            image_features(path)?
        } else {
            generic_features(path)?
        };

        debug!(
            path = %path.display(),
            kind = %features.file_kind,
            content_hash = %features.content_hash,
            "universal_features"
        );
        Ok(features)
    }

    /// The universal identifier: `<prefix>-<kind-code>-<HASH16>` over the
    /// canonical feature string.
    pub fn generate_id(&self, path: &Path) -> Result<String, UniversalError> {
        let features = self.features(path)?;
        Ok(self.id_for(&features))
    }

    fn id_for(&self, features: &FileFeatures) -> String {
        let digest = Sha256::digest(features.canonical_string().as_bytes());
        let hash16 = hex::encode_upper(digest)[..16].to_string();
        format!("{}-{}-{}", self.prefix, features.kind_code(), hash16)
    }

    /// Recompute the identifier and compare. Any extraction failure counts
    /// as a mismatch.
    pub fn verify_id(&self, path: &Path, expected: &str) -> bool {
        match self.generate_id(path) {
            Ok(actual) => actual == expected,
            Err(_) => false,
        }
    }

    /// Compare two files feature by feature.
    pub fn compare(&self, a: &Path, b: &Path) -> Result<FeatureComparison, UniversalError> {
        let features_a = self.features(a)?;
        let features_b = self.features(b)?;
        let id_a = self.id_for(&features_a);
        let id_b = self.id_for(&features_b);

        let both = |x: &Option<String>, y: &Option<String>| match (x, y) {
            (Some(x), Some(y)) => Some(x == y),
            _ => None,
        };

        Ok(FeatureComparison {
            identical_ids: id_a == id_b,
            same_kind: features_a.file_kind == features_b.file_kind,
            same_size: features_a.file_size == features_b.file_size,
            same_content_hash: features_a.content_hash == features_b.content_hash,
            same_visual_hash: both(&features_a.visual_hash, &features_b.visual_hash),
            same_text_hash: both(&features_a.text_hash, &features_b.text_hash),
            id_a,
            id_b,
        })
    }
}
