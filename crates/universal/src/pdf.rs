//! Feature extraction for PDF documents.
//!
//! PDF parsing and rasterization are external collaborators: callers
//! implement [`PdfInspector`] over whatever PDF toolkit they run, and this
//! module reduces the inspector's report to the feature record.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use image::DynamicImage;

use crate::features::{Dimensions, FileFeatures};
use crate::visual::visual_hash;
use crate::{short_hash, UniversalError};

/// Per-page facts delivered by the PDF collaborator.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Extracted page text.
    pub text: String,
    /// Number of embedded images.
    pub image_count: usize,
    /// Page width in points.
    pub width: f64,
    /// Page height in points.
    pub height: f64,
    /// Number of vector drawing objects.
    pub drawing_count: usize,
    /// Number of referenced fonts.
    pub font_count: usize,
}

/// Everything the collaborator reports about one PDF file.
#[derive(Debug, Clone, Default)]
pub struct PdfReport {
    /// Pages in document order.
    pub pages: Vec<PdfPage>,
    /// Document metadata dictionary. A `BTreeMap` so the serialized form is
    /// key-sorted without extra work.
    pub metadata: BTreeMap<String, String>,
    /// First page rendered at 1× scale, when the collaborator rasterizes.
    pub first_page_render: Option<DynamicImage>,
}

/// The PDF parsing/rasterization seam.
pub trait PdfInspector: Send + Sync {
    /// Inspect the file and report pages, metadata, and optionally a render
    /// of the first page.
    fn inspect(&self, path: &Path) -> Result<PdfReport, UniversalError>;
}

/// Reduce an inspector report to the feature record.
///
/// Each page contributes five feature lines (text length, image count,
/// page size with two-decimal dimensions, drawing count, font count); the
/// `\n`-joined lines hash into `content_hash`. The concatenated page text
/// and the key-sorted metadata JSON hash into `text_hash` and
/// `metadata_hash`, and the first-page render into the perceptual
/// `visual_hash`.
pub fn pdf_features(path: &Path, report: &PdfReport) -> Result<FileFeatures, UniversalError> {
    let meta = fs::metadata(path)?;

    let mut content_lines = Vec::with_capacity(report.pages.len() * 5);
    let mut text_content = String::new();
    for (index, page) in report.pages.iter().enumerate() {
        text_content.push_str(&page.text);
        content_lines.push(format!("page_{index}_text_length:{}", page.text.len()));
        content_lines.push(format!("page_{index}_images:{}", page.image_count));
        content_lines.push(format!(
            "page_{index}_size:{:.2}x{:.2}",
            page.width, page.height
        ));
        content_lines.push(format!("page_{index}_drawings:{}", page.drawing_count));
        content_lines.push(format!("page_{index}_fonts:{}", page.font_count));
    }

    let content_hash = short_hash(content_lines.join("\n").as_bytes());
    let text_hash = (!text_content.is_empty()).then(|| short_hash(text_content.as_bytes()));
    let metadata_hash = short_hash(serde_json::to_string(&report.metadata)?.as_bytes());
    let visual = report.first_page_render.as_ref().map(visual_hash);

    let (creation_time, modification_time) = super::generic::file_times(&meta);

    let mut features = FileFeatures::bare("PDF", meta.len(), content_hash);
    features.text_hash = text_hash;
    features.metadata_hash = Some(metadata_hash);
    features.visual_hash = visual;
    features.dimensions = report
        .pages
        .first()
        .map(|page| Dimensions::of_points(page.width, page.height));
    features.page_count = Some(report.pages.len());
    features.creation_time = creation_time;
    features.modification_time = modification_time;
    Ok(features)
}
