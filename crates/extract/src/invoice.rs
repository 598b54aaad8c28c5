//! VAT invoice extractor.

use once_cell::sync::Lazy;
use regex::Regex;

use evidence::TextEvidence;

use crate::result::{DocumentCategory, ExtractionResult};
use crate::util::{first_capture, fold_amount, fold_date, keyword_count, max_detected_amount};
use crate::FieldExtractor;

const KEYWORDS: [&str; 11] = [
    "faktura", "fv", "rachunek", "invoice", "sprzedawca", "nabywca", "nip", "vat", "brutto",
    "netto", "podatek",
];

static NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r"(?i)\b(?:faktura|fv|rachunek|dokumentu)\b\s*(?:vat)?\s*(?:nr|numer)?[:\s]+([A-Z0-9/\-]*\d+[A-Z0-9/\-]*)",
        )
        .expect("invoice number pattern"),
        Regex::new(r"(?i)\b(?:nr|numer)\b\s*(?:faktury|fv|dokumentu)?[:\s]+([A-Z0-9/\-]*\d+[A-Z0-9/\-]*)")
            .expect("invoice number pattern"),
    ]
});

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)data\s*wystawienia[:\s]*(\d{2,4}[.\-/]\d{2}[.\-/]\d{2,4})")
            .expect("issue date pattern"),
        Regex::new(r"(?i)wystawion[ao]\s*(?:dnia)?[:\s]*(\d{2,4}[.\-/]\d{2}[.\-/]\d{2,4})")
            .expect("issue date pattern"),
        Regex::new(r"(?i)data[:\s]*(\d{2,4}[.\-/]\d{2}[.\-/]\d{2,4})").expect("issue date pattern"),
    ]
});

static GROSS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)brutto[:\s]*(\d[\d\s,.]*\d)").expect("gross pattern"));
static NET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)netto[:\s]*(\d[\d\s,.]*\d)").expect("net pattern"));
static VAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:vat|podatek)[:\s]*(\d[\d\s,.]*\d)").expect("vat pattern"));

/// Recognizes faktura VAT documents.
///
/// The issuer's tax id is taken to be the first detected one and the
/// buyer's the second; Polish invoices print the seller block first. When
/// no explicit `brutto` marker is found the largest detected amount is used
/// as the gross — a known limitation: on documents that list netto last
/// this can conflate net and gross. The behavior is kept for identifier
/// compatibility.
#[derive(Debug, Default, Clone, Copy)]
pub struct InvoiceExtractor;

impl FieldExtractor for InvoiceExtractor {
    fn category(&self) -> DocumentCategory {
        DocumentCategory::Invoice
    }

    fn can_extract(&self, ev: &TextEvidence) -> (bool, f32) {
        let text_lower = ev.full_text.to_lowercase();
        let keywords = keyword_count(&text_lower, &KEYWORDS) as f32;

        let structural = [
            !ev.detected_tax_ids.is_empty(),
            !ev.detected_amounts.is_empty(),
            !ev.detected_doc_numbers.is_empty(),
        ]
        .iter()
        .filter(|present| **present)
        .count() as f32;

        let confidence = (keywords * 0.15 + structural * 0.2).min(1.0);
        (confidence > crate::CONFIDENCE_THRESHOLD, confidence)
    }

    fn extract(&self, ev: &TextEvidence) -> ExtractionResult {
        let text = ev.full_text.as_str();

        let issuer = ev.detected_tax_ids.first().cloned();
        let buyer = ev.detected_tax_ids.get(1).cloned();

        let invoice_number = first_capture(&NUMBER_PATTERNS, text)
            .map(|m| m.trim().to_uppercase())
            .or_else(|| ev.detected_doc_numbers.first().cloned());

        let issue_date = first_capture(&DATE_PATTERNS, text)
            .map(fold_date)
            .or_else(|| ev.detected_dates.first().map(|d| fold_date(d)));

        let find_amount = |pattern: &Regex| {
            pattern
                .captures(text)
                .and_then(|c| c.get(1))
                .and_then(|m| fold_amount(m.as_str()))
        };
        let gross = find_amount(&GROSS).or_else(|| max_detected_amount(&ev.detected_amounts));
        let net = find_amount(&NET);
        let vat = find_amount(&VAT);

        ExtractionResult {
            document_date: issue_date,
            issuer_tax_id: issuer,
            buyer_tax_id: buyer,
            invoice_number,
            gross_amount: gross,
            net_amount: net,
            vat_amount: vat,
            raw_text: Some(ev.full_text.clone()),
            ..ExtractionResult::empty(DocumentCategory::Invoice, ev.average_confidence)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_counts_keywords_and_structure() {
        let ev = TextEvidence::scan(
            "Faktura VAT nr FV/1/2025, sprzedawca NIP: 5213017228, brutto: 100,00 zł",
            0.9,
        );
        let (accepted, confidence) = InvoiceExtractor.can_extract(&ev);
        assert!(accepted);
        assert!(confidence > 0.6);
    }

    #[test]
    fn plain_prose_scores_below_threshold() {
        let ev = TextEvidence::scan("notatka ze spotkania zarządu", 0.9);
        let (accepted, _) = InvoiceExtractor.can_extract(&ev);
        assert!(!accepted);
    }

    #[test]
    fn number_recovery_prefers_anchored_match() {
        let ev = TextEvidence::scan("Faktura nr FV/2025/00142 z dnia 15.01.2025", 0.9);
        let result = InvoiceExtractor.extract(&ev);
        assert_eq!(result.invoice_number.as_deref(), Some("FV/2025/00142"));
    }

    #[test]
    fn gross_falls_back_to_largest_detected_amount() {
        let ev = TextEvidence::scan(
            "Faktura. Pozycje: 12,00 zł, 999,99 zł, 100,00 zł. NIP 5213017228",
            0.9,
        );
        let result = InvoiceExtractor.extract(&ev);
        assert_eq!(result.gross_amount.as_deref(), Some("999.99"));
    }

    #[test]
    fn anchored_gross_wins_over_maximum() {
        let ev = TextEvidence::scan("Brutto: 100,00 zł\nKaucja: 500,00 zł", 0.9);
        let result = InvoiceExtractor.extract(&ev);
        assert_eq!(result.gross_amount.as_deref(), Some("100.00"));
    }

    #[test]
    fn gross_with_three_decimal_digits_rounds_half_up() {
        // The anchored pattern has no decimal-digit limit, so OCR can hand
        // over a three-digit tail; the tie must round away from zero.
        let ev = TextEvidence::scan("Brutto: 1230,525 zł", 0.9);
        let result = InvoiceExtractor.extract(&ev);
        assert_eq!(result.gross_amount.as_deref(), Some("1230.53"));
    }

    #[test]
    fn issue_date_folds_to_iso() {
        let ev = TextEvidence::scan("Data wystawienia: 15.01.2025", 0.9);
        let result = InvoiceExtractor.extract(&ev);
        assert_eq!(result.document_date.as_deref(), Some("2025-01-15"));
    }
}
