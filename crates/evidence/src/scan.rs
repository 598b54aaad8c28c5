//! Structured-token scanners.
//!
//! Each scanner sweeps raw document text for one token kind and returns the
//! candidates in document order with first-occurrence deduplication. The
//! patterns are compiled once per process and anchored on explicit keywords
//! where the token shape alone would be too noisy.

use once_cell::sync::Lazy;
use regex::Regex;

use canonical::normalize;

static NIP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)NIP[:\s]*(\d{3}[-\s]?\d{3}[-\s]?\d{2}[-\s]?\d{2})",
        r"(?i)NIP[:\s]*(\d{10})",
        r"(\d{3}-\d{3}-\d{2}-\d{2})",
    ])
});

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit-run pattern"));

static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(\d{1,3}(?:[\s\x{a0}]?\d{3})*[,.]\d{2})\s*(?:zł|PLN|złotych)?",
        r"(?i)(?:brutto|netto|razem|suma|do zapłaty)[:\s]*(\d{1,3}(?:[\s\x{a0}]?\d{3})*[,.]\d{2})",
        r"(?i)(\d+[,.]\d{2})\s*(?:zł|PLN)",
    ])
});

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"\b(\d{2}[-./]\d{2}[-./]\d{4})\b",
        r"\b(\d{4}[-./]\d{2}[-./]\d{2})\b",
        r"\b(\d{2}[-./]\d{2}[-./]\d{2})\b",
    ])
});

static DOC_NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)(?:faktura|fv|rachunek|nr)[:\s]*([A-Z0-9/\-]+\d+[A-Z0-9/\-]*)",
        r"(?i)(?:numer|nr)[:\s]*([A-Z]{1,3}[\s/\-]?\d{1,4}[\s/\-]?\d{2,4}[\s/\-]?\d{2,6})",
        r"(?i)(FV[\s/\-]?\d+[\s/\-]?\d*[\s/\-]?\d*)",
        r"(?i)(F[\s/\-]?\d+[\s/\-]?\d{4})",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("scanner pattern compiles"))
        .collect()
}

fn push_unique(results: &mut Vec<String>, candidate: String) {
    if !results.contains(&candidate) {
        results.push(candidate);
    }
}

/// Find checksum-valid Polish tax identifiers.
///
/// Keyword-anchored and bare `DDD-DDD-DD-DD` shapes come first, then digit
/// runs of exactly ten digits (a run embedded in a longer number does not
/// count). Every candidate must pass the NIP checksum to be admitted.
pub fn tax_ids(text: &str) -> Vec<String> {
    let mut results = Vec::new();
    let consider = |raw: &str, results: &mut Vec<String>| {
        let digits: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        if digits.len() == 10
            && digits.bytes().all(|b| b.is_ascii_digit())
            && normalize::validate_nip(&digits)
        {
            push_unique(results, digits);
        }
    };

    for pattern in NIP_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            if let Some(m) = captures.get(1) {
                consider(m.as_str(), &mut results);
            }
        }
    }
    for run in DIGIT_RUNS.find_iter(text) {
        if run.as_str().len() == 10 {
            consider(run.as_str(), &mut results);
        }
    }

    results
}

/// Find monetary amounts.
///
/// Matches grouped-thousands decimals with an optional currency suffix,
/// keyword-anchored totals, and plain `D+[,.]DD` with a currency. Matches
/// are separator-stripped and the comma folded to a dot, but not otherwise
/// normalized — the amount normalizer owns rounding.
pub fn amounts(text: &str) -> Vec<String> {
    let mut results = Vec::new();
    for pattern in AMOUNT_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            if let Some(m) = captures.get(1) {
                let folded: String = m
                    .as_str()
                    .chars()
                    .filter(|c| *c != ' ' && *c != '\u{a0}')
                    .map(|c| if c == ',' { '.' } else { c })
                    .collect();
                push_unique(&mut results, folded);
            }
        }
    }
    results
}

/// Find date tokens (`DD-MM-YYYY`, `YYYY-MM-DD`, `DD-MM-YY` with `-`, `.`,
/// or `/` separators). Tokens are returned as matched; normalization happens
/// downstream.
pub fn dates(text: &str) -> Vec<String> {
    let mut results = Vec::new();
    for pattern in DATE_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            if let Some(m) = captures.get(1) {
                push_unique(&mut results, m.as_str().to_string());
            }
        }
    }
    results
}

/// Find document-number candidates near their introducing keywords.
///
/// Candidates are uppercased and must be at least four characters long to
/// drop bare ordinals.
pub fn doc_numbers(text: &str) -> Vec<String> {
    let mut results = Vec::new();
    for pattern in DOC_NUMBER_PATTERNS.iter() {
        for captures in pattern.captures_iter(text) {
            if let Some(m) = captures.get(1) {
                let normalized = m.as_str().trim().to_uppercase();
                if normalized.len() >= 4 {
                    push_unique(&mut results, normalized);
                }
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_ids_require_valid_checksum() {
        let text = "NIP: 521-301-72-28 oraz NIP: 1234567890";
        assert_eq!(tax_ids(text), vec!["5213017228"]);
    }

    #[test]
    fn bare_ten_digit_runs_are_candidates() {
        assert_eq!(tax_ids("kontrahent 5213017228"), vec!["5213017228"]);
        // Embedded in a longer run: not a candidate.
        assert!(tax_ids("konto 52130172280000").is_empty());
    }

    #[test]
    fn duplicate_tax_ids_collapse() {
        let text = "NIP: 5213017228\nNIP 5213017228";
        assert_eq!(tax_ids(text), vec!["5213017228"]);
    }

    #[test]
    fn amounts_fold_separators() {
        let found = amounts("Brutto: 1 230,50 zł\nNetto: 1000.41\nVAT 230,09 PLN");
        assert!(found.contains(&"1230.50".to_string()));
        assert!(found.contains(&"1000.41".to_string()));
        assert!(found.contains(&"230.09".to_string()));
    }

    #[test]
    fn amounts_accept_nbsp_grouping() {
        let found = amounts("Suma: 12\u{a0}345,67 zł");
        assert!(found.contains(&"12345.67".to_string()));
    }

    #[test]
    fn dates_match_common_shapes() {
        let found = dates("wystawiono 15.01.2025, sprzedano 2025-01-14, termin 01/02/25");
        assert_eq!(found[0], "15.01.2025");
        assert!(found.contains(&"2025-01-14".to_string()));
        assert!(found.contains(&"01/02/25".to_string()));
    }

    #[test]
    fn doc_numbers_are_keyword_anchored_and_uppercased() {
        let found = doc_numbers("Faktura nr fv/2025/00142");
        assert!(found.contains(&"FV/2025/00142".to_string()));
    }

    #[test]
    fn short_doc_numbers_are_dropped() {
        assert!(doc_numbers("nr 12").is_empty());
    }
}
