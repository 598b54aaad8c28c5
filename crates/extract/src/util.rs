//! Shared folding helpers for the extractors.
//!
//! These pre-fold matched field values into their canonical shapes so that
//! extractor-internal comparisons (keyword scoring aside, mostly "largest
//! detected amount") operate on comparable values. The canonical-layer
//! normalizers are idempotent, so folding here never changes the final
//! identifier.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})[/\-.](\d{2})[/\-.](\d{2})\b").expect("iso date pattern"));
static DAY_FIRST_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2})[/\-.](\d{2})[/\-.](\d{4})\b").expect("day-first pattern"));
static SHORT_YEAR_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2})[/\-.](\d{2})[/\-.](\d{2})\b").expect("short-year pattern"));

/// Fold a date token to ISO `YYYY-MM-DD`.
///
/// Recognizes `YYYY-MM-DD`, `DD-MM-YYYY`, and `DD-MM-YY` (expanded to
/// `20YY`), searching anywhere in the input. Unrecognized input passes
/// through unchanged.
pub fn fold_date(input: &str) -> String {
    if let Some(c) = ISO_DATE.captures(input) {
        return format!("{}-{}-{}", &c[1], &c[2], &c[3]);
    }
    if let Some(c) = DAY_FIRST_DATE.captures(input) {
        return format!("{}-{}-{}", &c[3], &c[2], &c[1]);
    }
    if let Some(c) = SHORT_YEAR_DATE.captures(input) {
        return format!("20{}-{}-{}", &c[3], &c[2], &c[1]);
    }
    input.to_string()
}

/// Fold an amount token to `D…D.DD`, or `None` when unparseable.
///
/// Strips everything but digits, commas, and dots; folds the comma to a
/// dot; the rightmost dot is the decimal point and any dot left of it is a
/// thousands separator. Rounds half-up, the same rule the canonical amount
/// normalizer applies.
pub fn fold_amount(input: &str) -> Option<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let folded = match cleaned.rfind('.') {
        Some(split) => {
            let integer: String = cleaned[..split].chars().filter(|c| *c != '.').collect();
            format!("{integer}.{}", &cleaned[split + 1..])
        }
        None => cleaned,
    };

    let value = Decimal::from_str(&folded).ok()?;
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    Some(rounded.to_string())
}

/// The largest amount among the detected candidates, folded.
pub fn max_detected_amount(detected: &[String]) -> Option<String> {
    detected
        .iter()
        .filter_map(|raw| {
            let folded = fold_amount(raw)?;
            Decimal::from_str(&folded).ok()
        })
        .max()
        .map(|value| {
            let mut rounded = value;
            rounded.rescale(2);
            rounded.to_string()
        })
}

/// Count how many of the keywords occur in the (lowercased) text.
pub fn keyword_count(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text_lower.contains(*kw)).count()
}

/// First capture of the first matching pattern.
pub fn first_capture<'t>(patterns: &[Regex], text: &'t str) -> Option<&'t str> {
    patterns
        .iter()
        .find_map(|p| p.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_date_shapes() {
        assert_eq!(fold_date("2025-01-15"), "2025-01-15");
        assert_eq!(fold_date("15.01.2025"), "2025-01-15");
        assert_eq!(fold_date("15/01/25"), "2025-01-15");
        assert_eq!(fold_date("jutro"), "jutro");
    }

    #[test]
    fn fold_amount_shapes() {
        assert_eq!(fold_amount("1 230,50 zł").as_deref(), Some("1230.50"));
        assert_eq!(fold_amount("1.234.567,89").as_deref(), Some("1234567.89"));
        assert_eq!(fold_amount("45.99").as_deref(), Some("45.99"));
        assert_eq!(fold_amount("brak"), None);
    }

    #[test]
    fn fold_amount_rounds_half_up_on_ties() {
        assert_eq!(fold_amount("1230,525").as_deref(), Some("1230.53"));
        assert_eq!(fold_amount("0,005 zł").as_deref(), Some("0.01"));
    }

    #[test]
    fn fold_amount_matches_the_canonical_normalizer() {
        // The pre-fold must agree with the canonical amount normalizer on
        // every parseable surface form, including totals with no grosze
        // and odd-length decimal tails.
        let samples = ["1.234.567", "1 230,50 zł", "1230,525", "45,9", "123"];
        for sample in samples {
            let folded = fold_amount(sample).expect("parseable amount");
            assert_eq!(folded, canonical::normalize::amount(sample), "{sample:?}");
            // And it is a true pre-fold: re-normalizing is the identity.
            assert_eq!(canonical::normalize::amount(&folded), folded, "{sample:?}");
        }
    }

    #[test]
    fn max_amount_compares_numerically() {
        let detected = vec!["999.99".to_string(), "1230.50".to_string(), "45.99".to_string()];
        assert_eq!(max_detected_amount(&detected).as_deref(), Some("1230.50"));
        assert_eq!(max_detected_amount(&[]), None);
    }
}
