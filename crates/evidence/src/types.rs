//! Core data model for acquired document text.
//!
//! These types are the contract between the text-acquisition boundary (OCR
//! engines, plain-text readers) and the extraction layer.

use serde::{Deserialize, Serialize};

use crate::scan;

/// One recognized line of text with its confidence and optional bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceLine {
    /// Recognized text of the line.
    pub text: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
    /// Pixel bounding box `x1, y1, x2, y2` when the source had geometry.
    pub bbox: Option<[i32; 4]>,
}

/// Everything the pipeline knows about a document's text.
///
/// The four detected lists hold *candidates* in document order; the first
/// occurrence of a token wins on merge, which is what makes "first tax id =
/// issuer" hold across multi-page sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEvidence {
    /// Line-separated recognized text.
    pub full_text: String,
    /// Per-line recognition results.
    pub lines: Vec<EvidenceLine>,
    /// Mean line confidence in `[0, 1]`. Plain-text sources report `1.0`.
    pub average_confidence: f32,
    /// Originating file, when known.
    pub source: Option<String>,
    /// Checksum-valid tax identifiers, bare ten-digit form.
    pub detected_tax_ids: Vec<String>,
    /// Monetary amounts, separator-stripped with `.` as the decimal point.
    pub detected_amounts: Vec<String>,
    /// Date tokens as matched, unnormalized.
    pub detected_dates: Vec<String>,
    /// Uppercased document-number candidates.
    pub detected_doc_numbers: Vec<String>,
}

impl TextEvidence {
    /// Build evidence from plain text by running the structured-token
    /// scanners over it. The whole text becomes a single line.
    pub fn scan(text: impl Into<String>, confidence: f32) -> TextEvidence {
        let full_text = text.into();
        let line = EvidenceLine {
            text: full_text.clone(),
            confidence,
            bbox: None,
        };
        TextEvidence {
            detected_tax_ids: scan::tax_ids(&full_text),
            detected_amounts: scan::amounts(&full_text),
            detected_dates: scan::dates(&full_text),
            detected_doc_numbers: scan::doc_numbers(&full_text),
            lines: vec![line],
            average_confidence: confidence,
            source: None,
            full_text,
        }
    }

    /// Attach the originating file path.
    pub fn with_source(mut self, source: impl Into<String>) -> TextEvidence {
        self.source = Some(source.into());
        self
    }

    /// Collapse per-page evidence into a single record.
    ///
    /// Page texts are joined with `\n\n`, the detected lists are unioned
    /// with first-occurrence order preserved, and the confidence is the mean
    /// of the page confidences. Returns `None` for an empty page list.
    pub fn merge_pages(pages: Vec<TextEvidence>) -> Option<TextEvidence> {
        if pages.is_empty() {
            return None;
        }
        if pages.len() == 1 {
            return pages.into_iter().next();
        }

        let page_count = pages.len() as f32;
        let full_text = pages
            .iter()
            .map(|p| p.full_text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let average_confidence =
            pages.iter().map(|p| p.average_confidence).sum::<f32>() / page_count;
        let source = pages.iter().find_map(|p| p.source.clone());

        let mut lines = Vec::new();
        let mut tax_ids = Vec::new();
        let mut amounts = Vec::new();
        let mut dates = Vec::new();
        let mut doc_numbers = Vec::new();
        for page in pages {
            lines.extend(page.lines);
            union_into(&mut tax_ids, page.detected_tax_ids);
            union_into(&mut amounts, page.detected_amounts);
            union_into(&mut dates, page.detected_dates);
            union_into(&mut doc_numbers, page.detected_doc_numbers);
        }

        Some(TextEvidence {
            full_text,
            lines,
            average_confidence,
            source,
            detected_tax_ids: tax_ids,
            detected_amounts: amounts,
            detected_dates: dates,
            detected_doc_numbers: doc_numbers,
        })
    }
}

fn union_into(accumulator: &mut Vec<String>, incoming: Vec<String>) {
    for token in incoming {
        if !accumulator.contains(&token) {
            accumulator.push(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page_merge_is_identity() {
        let page = TextEvidence::scan("NIP: 5213017228", 0.5).with_source("a.txt");
        let merged = TextEvidence::merge_pages(vec![page.clone()]).expect("one page");
        assert_eq!(merged, page);
    }

    #[test]
    fn merge_keeps_first_source() {
        let a = TextEvidence::scan("x", 1.0);
        let b = TextEvidence::scan("y", 1.0).with_source("b.txt");
        let merged = TextEvidence::merge_pages(vec![a, b]).expect("pages");
        assert_eq!(merged.source.as_deref(), Some("b.txt"));
        assert_eq!(merged.lines.len(), 2);
    }
}
