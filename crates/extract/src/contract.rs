//! Contract extractor.

use once_cell::sync::Lazy;
use regex::Regex;

use evidence::TextEvidence;

use crate::result::{DocumentCategory, ExtractionResult};
use crate::util::{first_capture, fold_date, keyword_count};
use crate::FieldExtractor;

const KEYWORDS: [&str; 11] = [
    "umowa",
    "kontrakt",
    "porozumienie",
    "zlecenie",
    "strona",
    "wykonawca",
    "zamawiający",
    "zleceniodawca",
    "przedmiot",
    "wynagrodzenie",
    "termin",
];

/// Contract type resolved from wording, in lookup order.
const CONTRACT_TYPES: [(&str, &str); 6] = [
    ("zlecenie", "ZLECENIE"),
    ("o dzieło", "DZIELO"),
    ("najmu", "NAJEM"),
    ("sprzedaży", "SPRZEDAZ"),
    ("współpracy", "WSPOLPRACA"),
    ("o pracę", "PRACA"),
];

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)zawarta\s*(?:w\s*dniu)?[:\s]*(\d{2}[.\-/]\d{2}[.\-/]\d{4})")
            .expect("contract date pattern"),
        Regex::new(r"(?i)dnia[:\s]*(\d{2}[.\-/]\d{2}[.\-/]\d{4})").expect("contract date pattern"),
        Regex::new(r"(?i)data[:\s]*(\d{2}[.\-/]\d{2}[.\-/]\d{4})").expect("contract date pattern"),
    ]
});

static NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)umowa\s*(?:nr|numer)?[:\s]*([A-Z0-9/\-]+)").expect("contract number"),
        Regex::new(r"(?i)(?:nr|numer)\s*(?:umowy)?[:\s]*([A-Z0-9/\-]+)").expect("contract number"),
    ]
});

/// Recognizes umowa documents.
///
/// Both parties' tax ids are lifted from the detected list in document
/// order; the identifier layer sorts them so party order never matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContractExtractor;

impl FieldExtractor for ContractExtractor {
    fn category(&self) -> DocumentCategory {
        DocumentCategory::Contract
    }

    fn can_extract(&self, ev: &TextEvidence) -> (bool, f32) {
        let text_lower = ev.full_text.to_lowercase();
        let keywords = keyword_count(&text_lower, &KEYWORDS) as f32;

        let has_header = text_lower.contains("umowa") || text_lower.contains("kontrakt");
        let has_parties = text_lower.contains("strona") || text_lower.contains("wykonawca");

        let mut confidence = keywords * 0.1;
        if has_header {
            confidence += 0.3;
        }
        if has_parties {
            confidence += 0.2;
        }
        let confidence = confidence.min(1.0);
        (confidence > crate::CONFIDENCE_THRESHOLD, confidence)
    }

    fn extract(&self, ev: &TextEvidence) -> ExtractionResult {
        let text = ev.full_text.as_str();
        let text_lower = text.to_lowercase();

        let contract_date = first_capture(&DATE_PATTERNS, text)
            .map(fold_date)
            .or_else(|| ev.detected_dates.first().map(|d| fold_date(d)));

        let contract_number =
            first_capture(&NUMBER_PATTERNS, text).map(|m| m.trim().to_uppercase());

        let contract_type = CONTRACT_TYPES
            .iter()
            .find(|(marker, _)| text_lower.contains(marker))
            .map(|(_, label)| (*label).to_string());

        ExtractionResult {
            document_date: contract_date,
            issuer_tax_id: ev.detected_tax_ids.first().cloned(),
            second_party_tax_id: ev.detected_tax_ids.get(1).cloned(),
            contract_number,
            contract_type,
            raw_text: Some(ev.full_text.clone()),
            ..ExtractionResult::empty(DocumentCategory::Contract, ev.average_confidence)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract_text() -> &'static str {
        "UMOWA nr U/2025/07\n\
         zawarta w dniu 15.01.2025 pomiędzy:\n\
         Zleceniodawca: Firma X, NIP 5213017228\n\
         Wykonawca: Firma Y, NIP 9876543210\n\
         Przedmiot: zlecenie usług księgowych. Wynagrodzenie: 5000 zł."
    }

    #[test]
    fn header_and_parties_carry_the_score() {
        let ev = TextEvidence::scan(contract_text(), 0.9);
        let (accepted, confidence) = ContractExtractor.can_extract(&ev);
        assert!(accepted);
        assert!(confidence > 0.6);
    }

    #[test]
    fn both_parties_and_date_recovered() {
        let ev = TextEvidence::scan(contract_text(), 0.9);
        let result = ContractExtractor.extract(&ev);
        assert_eq!(result.issuer_tax_id.as_deref(), Some("5213017228"));
        assert_eq!(result.second_party_tax_id.as_deref(), Some("9876543210"));
        assert_eq!(result.document_date.as_deref(), Some("2025-01-15"));
    }

    #[test]
    fn number_and_type_recovered() {
        let ev = TextEvidence::scan(contract_text(), 0.9);
        let result = ContractExtractor.extract(&ev);
        assert_eq!(result.contract_number.as_deref(), Some("U/2025/07"));
        assert_eq!(result.contract_type.as_deref(), Some("ZLECENIE"));
    }

    #[test]
    fn plain_prose_is_rejected() {
        let ev = TextEvidence::scan("prognoza pogody na jutro: słonecznie", 0.9);
        let (accepted, _) = ContractExtractor.can_extract(&ev);
        assert!(!accepted);
    }
}
