//! Fiscal receipt extractor.

use once_cell::sync::Lazy;
use regex::Regex;

use evidence::TextEvidence;

use crate::result::{DocumentCategory, ExtractionResult};
use crate::util::{first_capture, fold_amount, fold_date, keyword_count, max_detected_amount};
use crate::FieldExtractor;

const KEYWORDS: [&str; 9] = [
    "paragon", "fiskalny", "kasa", "sprzedaż", "gotówka", "karta", "reszta", "ptu", "suma",
];

static TOTAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)suma[:\s]*(\d[\d\s,.]*\d)").expect("total pattern"),
        Regex::new(r"(?i)razem[:\s]*(\d[\d\s,.]*\d)").expect("total pattern"),
        Regex::new(r"(?i)do zapłaty[:\s]*(\d[\d\s,.]*\d)").expect("total pattern"),
    ]
});

static RECEIPT_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:nr|numer)\s*(?:paragonu)?[:\s]*(\d+)").expect("receipt number"));
static CASH_REGISTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:kasa|stanowisko)[:\s]*(\d+)").expect("register number"));

static PERCENT_MARK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+%").expect("percent mark"));

/// Recognizes paragon fiskalny documents.
///
/// Receipts have no buyer block and often no unique number; the gross comes
/// from the `SUMA`/`RAZEM`/`DO ZAPŁATY` line or, failing that, the largest
/// detected amount.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReceiptExtractor;

impl FieldExtractor for ReceiptExtractor {
    fn category(&self) -> DocumentCategory {
        DocumentCategory::Receipt
    }

    fn can_extract(&self, ev: &TextEvidence) -> (bool, f32) {
        let text_lower = ev.full_text.to_lowercase();
        let keywords = keyword_count(&text_lower, &KEYWORDS) as f32;

        let has_fiscal_markers =
            text_lower.contains("fiskaln") || text_lower.contains("paragon");
        let has_ptu = text_lower.contains("ptu") || PERCENT_MARK.is_match(&text_lower);

        let mut confidence = keywords * 0.15;
        if has_fiscal_markers {
            confidence += 0.3;
        }
        if has_ptu {
            confidence += 0.2;
        }
        let confidence = confidence.min(1.0);
        (confidence > crate::CONFIDENCE_THRESHOLD, confidence)
    }

    fn extract(&self, ev: &TextEvidence) -> ExtractionResult {
        let text = ev.full_text.as_str();

        let gross = first_capture(&TOTAL_PATTERNS, text)
            .and_then(fold_amount)
            .or_else(|| max_detected_amount(&ev.detected_amounts));

        let receipt_number = RECEIPT_NUMBER
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        let cash_register = CASH_REGISTER
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        ExtractionResult {
            document_date: ev.detected_dates.first().map(|d| fold_date(d)),
            issuer_tax_id: ev.detected_tax_ids.first().cloned(),
            gross_amount: gross,
            receipt_number,
            cash_register_number: cash_register,
            raw_text: Some(ev.full_text.clone()),
            ..ExtractionResult::empty(DocumentCategory::Receipt, ev.average_confidence)
        }
    }
}
