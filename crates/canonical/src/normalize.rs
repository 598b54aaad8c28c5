//! Pure, total, idempotent field normalizers.
//!
//! One normalizer per field kind: tax identifiers ([`tax_id`]), monetary
//! amounts ([`amount`], [`amount_value`]), dates ([`date`], [`date_value`]),
//! and document numbers ([`doc_number`]). Each collapses every admissible
//! surface form of a field into exactly one canonical form.
//!
//! # Contract
//!
//! - **Total**: no input makes a normalizer fail. Malformed input maps to a
//!   canonical empty form (`""`, or `"0.00"` for amounts).
//! - **Idempotent**: `N(N(x)) == N(x)` for every input `x`.
//! - **Pure**: no I/O, no clock, no locale lookup.
//!
//! Amount arithmetic goes through [`rust_decimal`]; binary-float rounding
//! would misplace ties like `1230.555`.

use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

/// Date formats tried in order by [`date`]. First match wins.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", // 2025-01-15
    "%d-%m-%Y", // 15-01-2025
    "%d.%m.%Y", // 15.01.2025
    "%d/%m/%Y", // 15/01/2025
    "%Y/%m/%d", // 2025/01/15
    "%d %m %Y", // 15 01 2025
    "%Y%m%d",   // 20250115
];

/// Normalize a Polish tax identifier (NIP) to its bare ten-digit form.
///
/// Uppercases, removes whitespace, hyphens, and dots, then drops a leading
/// two-letter country code. The country prefix is dropped only when the
/// remainder is exactly ten decimal digits; otherwise the cleaned string is
/// returned with the prefix intact, so digits are never fabricated and the
/// function stays idempotent on alphabetic junk.
///
/// ```
/// use canonical::normalize;
///
/// assert_eq!(normalize::tax_id("521-301-72-28"), "5213017228");
/// assert_eq!(normalize::tax_id("PL 521 301 72 28"), "5213017228");
/// ```
pub fn tax_id(input: &str) -> String {
    let cleaned: String = input
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .collect();

    let stripped = strip_country_prefix(&cleaned);
    if stripped.len() == 10 && stripped.bytes().all(|b| b.is_ascii_digit()) {
        stripped.to_string()
    } else {
        cleaned
    }
}

fn strip_country_prefix(cleaned: &str) -> &str {
    let bytes = cleaned.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_uppercase() && bytes[1].is_ascii_uppercase() {
        &cleaned[2..]
    } else {
        cleaned
    }
}

/// Checksum validation for a Polish NIP.
///
/// Applies the weights `[6, 5, 7, 2, 3, 4, 5, 6, 7]` to the first nine
/// digits; the weighted sum modulo 11 must equal the tenth digit. A
/// remainder of 10 can never match and therefore never validates.
///
/// Validation gates scanner candidates; the normalizer itself never rejects.
///
/// ```
/// use canonical::normalize;
///
/// assert!(normalize::validate_nip("5213017228"));
/// assert!(!normalize::validate_nip("1234567890"));
/// ```
pub fn validate_nip(input: &str) -> bool {
    const WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];

    let nip = tax_id(input);
    if nip.len() != 10 || !nip.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<u32> = nip.bytes().map(|b| u32::from(b - b'0')).collect();
    let checksum: u32 = WEIGHTS.iter().zip(&digits).map(|(w, d)| w * d).sum();
    checksum % 11 == digits[9]
}

/// Normalize a monetary amount given as free-form text.
///
/// Uppercases, then removes the currency letters (`Z`, `Ł`, `P`, `L`, `N` —
/// this is how the tokens `ZŁ` and `PLN` disappear) together with all
/// whitespace including the non-breaking space. Commas fold to dots, the
/// rightmost dot is taken as the decimal point, and any dots left of it are
/// treated as thousands separators. The result is rounded half-up to two
/// decimal places; anything unparseable becomes `"0.00"`.
///
/// ```
/// use canonical::normalize;
///
/// assert_eq!(normalize::amount("1 230,50 zł"), "1230.50");
/// assert_eq!(normalize::amount("1.234.567,89 PLN"), "1234567.89");
/// assert_eq!(normalize::amount("garbage"), "0.00");
/// ```
pub fn amount(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    for ch in input.to_uppercase().chars() {
        if ch.is_whitespace() || matches!(ch, 'Z' | 'Ł' | 'P' | 'L' | 'N') {
            continue;
        }
        cleaned.push(if ch == ',' { '.' } else { ch });
    }

    let folded = match cleaned.rfind('.') {
        Some(split) => {
            let integer: String = cleaned[..split].chars().filter(|c| *c != '.').collect();
            format!("{integer}.{}", &cleaned[split + 1..])
        }
        None => cleaned,
    };

    match Decimal::from_str(&folded) {
        Ok(value) => amount_value(value),
        Err(_) => "0.00".to_string(),
    }
}

/// Normalize a numeric amount: round half-up to two decimal places and emit
/// `D…D.DD`.
///
/// ```
/// use canonical::normalize;
/// use rust_decimal::Decimal;
///
/// assert_eq!(normalize::amount_value(Decimal::new(12305, 1)), "1230.50");
/// assert_eq!(normalize::amount_value(Decimal::new(1230555, 3)), "1230.56");
/// ```
pub fn amount_value(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}

/// Normalize a date string to ISO `YYYY-MM-DD`.
///
/// Tries the fixed format list first (ISO, day-first with `-`/`.`/`/`/space
/// separators, compact `YYYYMMDD`). When no format matches, falls back to
/// digit-run heuristics: with at least three runs, a four-digit first run is
/// read as `Y M D` and a four-digit third run as `D M Y`. Anything else is
/// returned trimmed but otherwise untouched — a date is never fabricated.
///
/// ```
/// use canonical::normalize;
///
/// assert_eq!(normalize::date("15.01.2025"), "2025-01-15");
/// assert_eq!(normalize::date("2025-01-15"), "2025-01-15");
/// assert_eq!(normalize::date("not a date"), "not a date");
/// ```
pub fn date(input: &str) -> String {
    static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit-run pattern"));

    let cleaned = input.trim();
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(cleaned, format) {
            return parsed.format("%Y-%m-%d").to_string();
        }
    }

    let runs: Vec<&str> = DIGIT_RUNS.find_iter(cleaned).map(|m| m.as_str()).collect();
    if runs.len() >= 3 {
        if runs[0].len() == 4 {
            // Year first: Y M D.
            return format!("{}-{:0>2}-{:0>2}", runs[0], runs[1], runs[2]);
        }
        if runs[2].len() == 4 {
            // Year last: D M Y.
            return format!("{}-{:0>2}-{:0>2}", runs[2], runs[1], runs[0]);
        }
    }

    cleaned.to_string()
}

/// Normalize an already-parsed date.
pub fn date_value(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Normalize a document number (invoice, correction, contract, ...).
///
/// Uppercases, folds runs of whitespace, underscores, and hyphens into `/`,
/// collapses repeated `/`, and trims `/` from both ends.
///
/// ```
/// use canonical::normalize;
///
/// assert_eq!(normalize::doc_number("fv/2025/00142"), "FV/2025/00142");
/// assert_eq!(normalize::doc_number("FV 2025 142"), "FV/2025/142");
/// ```
pub fn doc_number(input: &str) -> String {
    static SEPARATOR_RUNS: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[\s_\-]+").expect("separator pattern"));
    static SLASH_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"/+").expect("slash pattern"));

    let upper = input.trim().to_uppercase();
    let slashed = SEPARATOR_RUNS.replace_all(&upper, "/");
    let collapsed = SLASH_RUNS.replace_all(&slashed, "/");
    collapsed.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_id_strips_separators_and_country_prefix() {
        assert_eq!(tax_id("521-301-72-28"), "5213017228");
        assert_eq!(tax_id("PL 521 301 72 28"), "5213017228");
        assert_eq!(tax_id("pl5213017228"), "5213017228");
        assert_eq!(tax_id("521.301.72.28"), "5213017228");
    }

    #[test]
    fn tax_id_never_fabricates_digits() {
        assert_eq!(tax_id("12345"), "12345");
        assert_eq!(tax_id("ABCD123"), "ABCD123");
        assert_eq!(tax_id(""), "");
    }

    #[test]
    fn nip_checksum_vectors() {
        assert!(validate_nip("5213017228"));
        assert!(validate_nip("PL 521-301-72-28"));
        assert!(!validate_nip("1234567890"));
        assert!(!validate_nip("521301722"));
        assert!(!validate_nip("52130172280"));
        assert!(!validate_nip("52130172a8"));
    }

    #[test]
    fn amount_handles_locale_surface_forms() {
        assert_eq!(amount("1 230,50 zł"), "1230.50");
        assert_eq!(amount("1230.5"), "1230.50");
        assert_eq!(amount("1\u{a0}234\u{a0}567,89 PLN"), "1234567.89");
        assert_eq!(amount("45,99"), "45.99");
        assert_eq!(amount("1.234,56"), "1234.56");
        assert_eq!(amount("123"), "123.00");
    }

    #[test]
    fn amount_rounds_half_up_on_decimals() {
        assert_eq!(amount("1230.555"), "1230.56");
        assert_eq!(amount("0.005"), "0.01");
        assert_eq!(amount_value(Decimal::new(1230555, 3)), "1230.56");
    }

    #[test]
    fn amount_failure_is_zero() {
        assert_eq!(amount(""), "0.00");
        assert_eq!(amount("brak danych"), "0.00");
    }

    #[test]
    fn date_format_ladder() {
        assert_eq!(date("2025-01-15"), "2025-01-15");
        assert_eq!(date("15-01-2025"), "2025-01-15");
        assert_eq!(date("15.01.2025"), "2025-01-15");
        assert_eq!(date("15/01/2025"), "2025-01-15");
        assert_eq!(date("2025/01/15"), "2025-01-15");
        assert_eq!(date("15 01 2025"), "2025-01-15");
        assert_eq!(date("20250115"), "2025-01-15");
    }

    #[test]
    fn date_digit_run_fallback() {
        assert_eq!(date("rok 2025, miesiąc 1, dzień 5"), "2025-01-05");
        assert_eq!(date("5 stycznia 01 roku 2025"), "2025-01-05");
    }

    #[test]
    fn date_passes_through_unparseable_input() {
        assert_eq!(date("  wkrótce  "), "wkrótce");
        assert_eq!(date("15.01"), "15.01");
    }

    #[test]
    fn doc_number_folds_separators() {
        assert_eq!(doc_number("fv/2025/00142"), "FV/2025/00142");
        assert_eq!(doc_number("FV 2025 142"), "FV/2025/142");
        assert_eq!(doc_number("FV-2025_142"), "FV/2025/142");
        assert_eq!(doc_number("/FV//2025/"), "FV/2025");
        assert_eq!(doc_number(""), "");
    }

    #[test]
    fn every_normalizer_is_idempotent() {
        let samples = [
            "521-301-72-28",
            "PL 521 301 72 28",
            "ABCD123",
            "",
            "całkiem obok",
        ];
        for sample in samples {
            let once = tax_id(sample);
            assert_eq!(tax_id(&once), once, "tax_id({sample:?})");
        }

        let samples = ["1 230,50 zł", "1230.5", "garbage", "", "0.00", "1.234,56"];
        for sample in samples {
            let once = amount(sample);
            assert_eq!(amount(&once), once, "amount({sample:?})");
        }

        let samples = ["15.01.2025", "2025-01-15", "not a date", "", "5 x 01 x 2025"];
        for sample in samples {
            let once = date(sample);
            assert_eq!(date(&once), once, "date({sample:?})");
        }

        let samples = ["fv/2025/00142", "FV 2025 142", "", "///"];
        for sample in samples {
            let once = doc_number(sample);
            assert_eq!(doc_number(&once), once, "doc_number({sample:?})");
        }
    }
}
