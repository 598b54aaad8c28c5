//! Confidence-driven extractor selection.

use tracing::{debug, warn};

use evidence::TextEvidence;

use crate::contract::ContractExtractor;
use crate::invoice::InvoiceExtractor;
use crate::receipt::ReceiptExtractor;
use crate::result::{DocumentCategory, ExtractionResult};
use crate::util::fold_date;
use crate::FieldExtractor;

/// Minimum scorer confidence an extractor needs to claim a document.
pub const CONFIDENCE_THRESHOLD: f32 = 0.4;

/// Runs every extractor's scorer and hands the evidence to the winner.
///
/// Selection is strict-greater, so ties keep the earlier extractor in the
/// fixed order (invoice, receipt, contract). When nothing clears the
/// threshold the document stays [`DocumentCategory::Unknown`] and only the
/// shared fields are lifted from the evidence.
pub struct Classifier {
    extractors: Vec<Box<dyn FieldExtractor>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            extractors: vec![
                Box::new(InvoiceExtractor),
                Box::new(ReceiptExtractor),
                Box::new(ContractExtractor),
            ],
        }
    }
}

impl Classifier {
    /// Classify and extract with the best-fitting extractor.
    pub fn classify(&self, evidence: &TextEvidence) -> ExtractionResult {
        let mut best: Option<(&dyn FieldExtractor, f32)> = None;
        for extractor in &self.extractors {
            let (accepted, confidence) = extractor.can_extract(evidence);
            debug!(
                category = ?extractor.category(),
                accepted,
                confidence,
                "extractor_scored"
            );
            if accepted && best.map_or(true, |(_, current)| confidence > current) {
                best = Some((extractor.as_ref(), confidence));
            }
        }

        match best {
            Some((extractor, confidence)) => {
                debug!(category = ?extractor.category(), confidence, "extractor_selected");
                extractor.extract(evidence)
            }
            None => {
                warn!("no extractor cleared the confidence threshold");
                self.unclassified(evidence)
            }
        }
    }

    /// Run every accepting extractor and rank the results by scorer
    /// confidence, best first. Useful for diagnostics and comparisons.
    pub fn classify_all(&self, evidence: &TextEvidence) -> Vec<ExtractionResult> {
        let mut results: Vec<ExtractionResult> = self
            .extractors
            .iter()
            .filter_map(|extractor| {
                let (accepted, confidence) = extractor.can_extract(evidence);
                accepted.then(|| {
                    let mut result = extractor.extract(evidence);
                    result.confidence = confidence;
                    result
                })
            })
            .collect();
        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results
    }

    fn unclassified(&self, evidence: &TextEvidence) -> ExtractionResult {
        ExtractionResult {
            document_date: evidence.detected_dates.first().map(|d| fold_date(d)),
            issuer_tax_id: evidence.detected_tax_ids.first().cloned(),
            raw_text: Some(evidence.full_text.clone()),
            ..ExtractionResult::empty(DocumentCategory::Unknown, evidence.average_confidence)
        }
    }
}
