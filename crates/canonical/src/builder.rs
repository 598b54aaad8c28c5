//! Canonical-string recipes and identifier construction.
//!
//! Each document kind has a fixed recipe: the ordered list of canonical
//! field values joined with `|`. Trailing optional segments are appended
//! only when present and non-empty; leading and middle optionals collapse to
//! empty segments so positional alignment is preserved. The identifier is
//! `<prefix>-<kind-code>-<hash16>` where `hash16` is the first sixteen
//! uppercase hex characters of SHA-256 over the canonical string.
//!
//! Personal names never enter a canonical string verbatim; they are reduced
//! to the first eight hex digits of the MD5 of the uppercase trimmed name.

use std::fmt;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::kind::DocumentKind;
use crate::normalize;

/// A deterministic content-based document identifier.
///
/// Wire grammar: `^[A-Z0-9]{1,16}-[A-Z]{2,3}-[0-9A-F]{16}$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors raised when parsing an identifier string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdParseError {
    /// The identifier does not split into exactly `prefix-kind-hash`.
    #[error("identifier must have exactly three dash-separated parts: {0}")]
    MalformedStructure(String),
    /// The prefix is empty, too long, or carries characters outside `[A-Z0-9]`.
    #[error("invalid identifier prefix: {0}")]
    InvalidPrefix(String),
    /// The kind code is not two or three uppercase letters.
    #[error("invalid kind code: {0}")]
    InvalidKindCode(String),
    /// The hash segment is not sixteen uppercase hex characters.
    #[error("invalid hash segment: {0}")]
    InvalidHash(String),
}

/// Components of a parsed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedId {
    /// Instance prefix, e.g. `DOC`.
    pub prefix: String,
    /// Kind code as it appears on the wire.
    pub kind_code: String,
    /// Sixteen uppercase hex characters.
    pub hash: String,
    /// Resolved kind, when the code is one of the known fifteen.
    pub kind: Option<DocumentKind>,
}

/// Split an identifier into its components, validating the wire grammar.
///
/// The kind code is validated structurally (two or three uppercase letters)
/// but an unknown code still parses, with [`ParsedId::kind`] left empty, so
/// identifiers minted by newer deployments remain inspectable.
pub fn parse_document_id(id: &str) -> Result<ParsedId, IdParseError> {
    let parts: Vec<&str> = id.split('-').collect();
    if parts.len() != 3 {
        return Err(IdParseError::MalformedStructure(id.to_string()));
    }

    let (prefix, kind_code, hash) = (parts[0], parts[1], parts[2]);
    if prefix.is_empty()
        || prefix.len() > 16
        || !prefix.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    {
        return Err(IdParseError::InvalidPrefix(prefix.to_string()));
    }
    if !(2..=3).contains(&kind_code.len()) || !kind_code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(IdParseError::InvalidKindCode(kind_code.to_string()));
    }
    if hash.len() != 16
        || !hash.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
    {
        return Err(IdParseError::InvalidHash(hash.to_string()));
    }

    Ok(ParsedId {
        prefix: prefix.to_string(),
        kind_code: kind_code.to_string(),
        hash: hash.to_string(),
        kind: DocumentKind::from_code(kind_code),
    })
}

/// First sixteen uppercase hex characters of SHA-256 over the canonical
/// string's UTF-8 bytes.
pub fn hash16(canonical: &str) -> String {
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode_upper(digest)[..16].to_string()
}

fn name_digest(name: &str) -> String {
    let digest = Md5::digest(name.trim().to_uppercase().as_bytes());
    hex::encode(digest)[..8].to_string()
}

fn push_present(parts: &mut Vec<String>, value: Option<&str>, fold: impl Fn(&str) -> String) {
    if let Some(value) = value {
        let folded = fold(value);
        if !folded.is_empty() {
            parts.push(folded);
        }
    }
}

/// Builds identifiers with a configurable instance prefix.
///
/// The prefix defaults to `DOC` and must match `[A-Z0-9]{1,16}`; it changes
/// every identifier but never the hash, so two deployments with different
/// prefixes still agree on document equality through the hash segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentIdBuilder {
    prefix: String,
}

impl Default for DocumentIdBuilder {
    fn default() -> Self {
        DocumentIdBuilder { prefix: "DOC".to_string() }
    }
}

impl DocumentIdBuilder {
    /// Create a builder with a custom prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        DocumentIdBuilder { prefix: prefix.into() }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Derive the identifier for an already-assembled canonical string.
    ///
    /// This is the single sink all typed constructors feed into, and the
    /// entry point for kinds whose canonical string was produced elsewhere.
    pub fn issue(&self, kind: DocumentKind, canonical: &str) -> DocumentId {
        DocumentId(format!("{}-{}-{}", self.prefix, kind.code(), hash16(canonical)))
    }

    /// Check an identifier against a candidate canonical string.
    ///
    /// Recomputes the hash segment and compares it in constant time. Only
    /// the hash segment participates; prefix and kind are instance-local.
    pub fn verify(&self, id: &str, canonical: &str) -> bool {
        let Ok(parsed) = parse_document_id(id) else {
            return false;
        };
        let expected = hash16(canonical);
        parsed.hash.as_bytes().ct_eq(expected.as_bytes()).into()
    }

    // ── Canonical-string recipes ────────────────────────────────────────

    /// Faktura VAT: `issuer | number | issue date | gross`.
    pub fn invoice_canonical(
        &self,
        seller_tax_id: &str,
        invoice_number: &str,
        issue_date: &str,
        gross_amount: &str,
    ) -> String {
        [
            normalize::tax_id(seller_tax_id),
            normalize::doc_number(invoice_number),
            normalize::date(issue_date),
            normalize::amount(gross_amount),
        ]
        .join("|")
    }

    /// Paragon: `issuer | date | gross [| receipt number] [| register]`.
    ///
    /// Receipts carry no unique number of their own, so the optional
    /// identifiers are appended only when the till printed them.
    pub fn receipt_canonical(
        &self,
        seller_tax_id: &str,
        receipt_date: &str,
        gross_amount: &str,
        receipt_number: Option<&str>,
        cash_register: Option<&str>,
    ) -> String {
        let mut parts = vec![
            normalize::tax_id(seller_tax_id),
            normalize::date(receipt_date),
            normalize::amount(gross_amount),
        ];
        push_present(&mut parts, receipt_number, |v| v.trim().to_uppercase());
        push_present(&mut parts, cash_register, |v| v.trim().to_uppercase());
        parts.join("|")
    }

    /// Umowa: `min(nip) | max(nip) | date [| number] [| type]`.
    ///
    /// Party tax ids are sorted lexicographically so the order in which the
    /// parties appear on paper cannot affect the identifier.
    pub fn contract_canonical(
        &self,
        party1_tax_id: &str,
        party2_tax_id: &str,
        contract_date: &str,
        contract_number: Option<&str>,
        contract_type: Option<&str>,
    ) -> String {
        let mut ids = [normalize::tax_id(party1_tax_id), normalize::tax_id(party2_tax_id)];
        ids.sort();

        let mut parts = vec![
            ids[0].clone(),
            ids[1].clone(),
            normalize::date(contract_date),
        ];
        push_present(&mut parts, contract_number, |v| v.trim().to_uppercase());
        push_present(&mut parts, contract_type, |v| v.trim().to_uppercase());
        parts.join("|")
    }

    /// Wyciąg bankowy: `account digits | date [| statement number]`.
    pub fn bank_statement_canonical(
        &self,
        account_number: &str,
        statement_date: &str,
        statement_number: Option<&str>,
    ) -> String {
        let digits: String = account_number.chars().filter(char::is_ascii_digit).collect();
        let mut parts = vec![digits, normalize::date(statement_date)];
        push_present(&mut parts, statement_number, |v| v.trim().to_string());
        parts.join("|")
    }

    /// Korekta: `issuer | correction number | date | original number | gross`.
    pub fn correction_canonical(
        &self,
        seller_tax_id: &str,
        correction_number: &str,
        issue_date: &str,
        original_invoice_number: &str,
        gross_amount: &str,
    ) -> String {
        [
            normalize::tax_id(seller_tax_id),
            normalize::doc_number(correction_number),
            normalize::date(issue_date),
            normalize::doc_number(original_invoice_number),
            normalize::amount(gross_amount),
        ]
        .join("|")
    }

    /// KP/KW: `number | date | amount [| issuer nip] [| party name digest]`.
    ///
    /// The payer/recipient name is reduced to an eight-hex-digit MD5 digest
    /// so no personal data surfaces in the canonical key.
    pub fn cash_document_canonical(
        &self,
        document_number: &str,
        document_date: &str,
        amount: &str,
        issuer_tax_id: Option<&str>,
        party_name: Option<&str>,
    ) -> String {
        let mut parts = vec![
            document_number.trim().to_uppercase(),
            normalize::date(document_date),
            normalize::amount(amount),
        ];
        push_present(&mut parts, issuer_tax_id, normalize::tax_id);
        push_present(&mut parts, party_name, |v| name_digest(v));
        parts.join("|")
    }

    /// Rachunek: same shape as an invoice, different kind code.
    pub fn bill_canonical(
        &self,
        issuer_tax_id: &str,
        bill_number: &str,
        issue_date: &str,
        gross_amount: &str,
    ) -> String {
        self.invoice_canonical(issuer_tax_id, bill_number, issue_date, gross_amount)
    }

    /// Nota księgowa: `issuer | note number | date | amount [| recipient]`.
    pub fn debit_note_canonical(
        &self,
        issuer_tax_id: &str,
        note_number: &str,
        issue_date: &str,
        amount: &str,
        recipient_tax_id: Option<&str>,
    ) -> String {
        let mut parts = vec![
            normalize::tax_id(issuer_tax_id),
            note_number.trim().to_uppercase(),
            normalize::date(issue_date),
            normalize::amount(amount),
        ];
        push_present(&mut parts, recipient_tax_id, normalize::tax_id);
        parts.join("|")
    }

    /// WZ: `issuer | number | date [| recipient]`.
    pub fn delivery_note_canonical(
        &self,
        issuer_tax_id: &str,
        document_number: &str,
        issue_date: &str,
        recipient_tax_id: Option<&str>,
    ) -> String {
        let mut parts = vec![
            normalize::tax_id(issuer_tax_id),
            document_number.trim().to_uppercase(),
            normalize::date(issue_date),
        ];
        push_present(&mut parts, recipient_tax_id, normalize::tax_id);
        parts.join("|")
    }

    /// Delegacja: `employee | date | total [| report number] [| company nip]`.
    pub fn expense_report_canonical(
        &self,
        employee_id: &str,
        report_date: &str,
        total_amount: &str,
        report_number: Option<&str>,
        company_tax_id: Option<&str>,
    ) -> String {
        let mut parts = vec![
            employee_id.trim().to_uppercase(),
            normalize::date(report_date),
            normalize::amount(total_amount),
        ];
        push_present(&mut parts, report_number, |v| v.trim().to_uppercase());
        push_present(&mut parts, company_tax_id, normalize::tax_id);
        parts.join("|")
    }

    /// Unknown kind: `content hash (64 hex) [| date] [| issuer nip]`.
    ///
    /// The seed is the full-text hash, so this recipe is format-sensitive in
    /// practice: OCR whitespace noise changes the identifier. Consumers that
    /// need stability for unclassified documents must supply typed fields.
    pub fn generic_canonical(
        &self,
        content_hash: &str,
        document_date: Option<&str>,
        issuer_tax_id: Option<&str>,
    ) -> String {
        let seed: String = content_hash.chars().take(64).collect();
        let mut parts = vec![seed];
        push_present(&mut parts, document_date, normalize::date);
        push_present(&mut parts, issuer_tax_id, normalize::tax_id);
        parts.join("|")
    }

    // ── Typed constructors ──────────────────────────────────────────────

    /// Identifier for a VAT invoice.
    pub fn invoice(
        &self,
        seller_tax_id: &str,
        invoice_number: &str,
        issue_date: &str,
        gross_amount: &str,
    ) -> DocumentId {
        let canonical =
            self.invoice_canonical(seller_tax_id, invoice_number, issue_date, gross_amount);
        self.issue(DocumentKind::Invoice, &canonical)
    }

    /// Identifier for a fiscal receipt.
    pub fn receipt(
        &self,
        seller_tax_id: &str,
        receipt_date: &str,
        gross_amount: &str,
        receipt_number: Option<&str>,
        cash_register: Option<&str>,
    ) -> DocumentId {
        let canonical = self.receipt_canonical(
            seller_tax_id,
            receipt_date,
            gross_amount,
            receipt_number,
            cash_register,
        );
        self.issue(DocumentKind::Receipt, &canonical)
    }

    /// Identifier for a contract.
    pub fn contract(
        &self,
        party1_tax_id: &str,
        party2_tax_id: &str,
        contract_date: &str,
        contract_number: Option<&str>,
        contract_type: Option<&str>,
    ) -> DocumentId {
        let canonical = self.contract_canonical(
            party1_tax_id,
            party2_tax_id,
            contract_date,
            contract_number,
            contract_type,
        );
        self.issue(DocumentKind::Contract, &canonical)
    }

    /// Identifier for a bank statement.
    pub fn bank_statement(
        &self,
        account_number: &str,
        statement_date: &str,
        statement_number: Option<&str>,
    ) -> DocumentId {
        let canonical =
            self.bank_statement_canonical(account_number, statement_date, statement_number);
        self.issue(DocumentKind::BankStatement, &canonical)
    }

    /// Identifier for a correcting invoice.
    pub fn correction(
        &self,
        seller_tax_id: &str,
        correction_number: &str,
        issue_date: &str,
        original_invoice_number: &str,
        gross_amount: &str,
    ) -> DocumentId {
        let canonical = self.correction_canonical(
            seller_tax_id,
            correction_number,
            issue_date,
            original_invoice_number,
            gross_amount,
        );
        self.issue(DocumentKind::Correction, &canonical)
    }

    /// Identifier for a cash-in (KP) voucher.
    pub fn cash_in(
        &self,
        document_number: &str,
        document_date: &str,
        amount: &str,
        issuer_tax_id: Option<&str>,
        payer_name: Option<&str>,
    ) -> DocumentId {
        let canonical = self.cash_document_canonical(
            document_number,
            document_date,
            amount,
            issuer_tax_id,
            payer_name,
        );
        self.issue(DocumentKind::CashIn, &canonical)
    }

    /// Identifier for a cash-out (KW) voucher.
    pub fn cash_out(
        &self,
        document_number: &str,
        document_date: &str,
        amount: &str,
        issuer_tax_id: Option<&str>,
        recipient_name: Option<&str>,
    ) -> DocumentId {
        let canonical = self.cash_document_canonical(
            document_number,
            document_date,
            amount,
            issuer_tax_id,
            recipient_name,
        );
        self.issue(DocumentKind::CashOut, &canonical)
    }

    /// Identifier for a non-VAT bill.
    pub fn bill(
        &self,
        issuer_tax_id: &str,
        bill_number: &str,
        issue_date: &str,
        gross_amount: &str,
    ) -> DocumentId {
        let canonical = self.bill_canonical(issuer_tax_id, bill_number, issue_date, gross_amount);
        self.issue(DocumentKind::Bill, &canonical)
    }

    /// Identifier for a debit note.
    pub fn debit_note(
        &self,
        issuer_tax_id: &str,
        note_number: &str,
        issue_date: &str,
        amount: &str,
        recipient_tax_id: Option<&str>,
    ) -> DocumentId {
        let canonical = self.debit_note_canonical(
            issuer_tax_id,
            note_number,
            issue_date,
            amount,
            recipient_tax_id,
        );
        self.issue(DocumentKind::DebitNote, &canonical)
    }

    /// Identifier for a delivery note (WZ).
    pub fn delivery_note(
        &self,
        issuer_tax_id: &str,
        document_number: &str,
        issue_date: &str,
        recipient_tax_id: Option<&str>,
    ) -> DocumentId {
        let canonical = self.delivery_note_canonical(
            issuer_tax_id,
            document_number,
            issue_date,
            recipient_tax_id,
        );
        self.issue(DocumentKind::DeliveryNote, &canonical)
    }

    /// Identifier for an expense report.
    pub fn expense_report(
        &self,
        employee_id: &str,
        report_date: &str,
        total_amount: &str,
        report_number: Option<&str>,
        company_tax_id: Option<&str>,
    ) -> DocumentId {
        let canonical = self.expense_report_canonical(
            employee_id,
            report_date,
            total_amount,
            report_number,
            company_tax_id,
        );
        self.issue(DocumentKind::ExpenseReport, &canonical)
    }

    /// Identifier for a document of unknown or unusual kind.
    pub fn generic(
        &self,
        kind: DocumentKind,
        content_hash: &str,
        document_date: Option<&str>,
        issuer_tax_id: Option<&str>,
    ) -> DocumentId {
        let canonical = self.generic_canonical(content_hash, document_date, issuer_tax_id);
        self.issue(kind, &canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> DocumentIdBuilder {
        DocumentIdBuilder::default()
    }

    #[test]
    fn identifier_grammar() {
        let id = builder().invoice("5213017228", "FV/1", "2025-01-15", "10");
        let parsed = parse_document_id(id.as_str()).expect("well-formed id");
        assert_eq!(parsed.prefix, "DOC");
        assert_eq!(parsed.kind_code, "FV");
        assert_eq!(parsed.kind, Some(DocumentKind::Invoice));
        assert_eq!(parsed.hash.len(), 16);
        assert!(parsed.hash.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(matches!(
            parse_document_id("DOC-FV"),
            Err(IdParseError::MalformedStructure(_))
        ));
        assert!(matches!(
            parse_document_id("doc-FV-0123456789ABCDEF"),
            Err(IdParseError::InvalidPrefix(_))
        ));
        assert!(matches!(
            parse_document_id("DOC-FVXX-0123456789ABCDEF"),
            Err(IdParseError::InvalidKindCode(_))
        ));
        assert!(matches!(
            parse_document_id("DOC-FV-0123456789abcdef"),
            Err(IdParseError::InvalidHash(_))
        ));
    }

    #[test]
    fn parse_accepts_unknown_kind_codes() {
        let parsed = parse_document_id("DOC-XYZ-0123456789ABCDEF").expect("structurally valid");
        assert_eq!(parsed.kind, None);
        assert_eq!(parsed.kind_code, "XYZ");
    }

    #[test]
    fn custom_prefix_changes_id_but_not_hash() {
        let default = builder().invoice("5213017228", "FV/1", "2025-01-15", "10");
        let custom = DocumentIdBuilder::new("ARCH").invoice("5213017228", "FV/1", "2025-01-15", "10");
        assert_ne!(default, custom);

        let hash_of = |id: &DocumentId| parse_document_id(id.as_str()).expect("valid").hash;
        assert_eq!(hash_of(&default), hash_of(&custom));
    }

    #[test]
    fn receipt_omits_absent_trailing_optionals() {
        let b = builder();
        let canonical = b.receipt_canonical("5213017228", "2025-01-15", "45.99", None, None);
        assert_eq!(canonical, "5213017228|2025-01-15|45.99");

        let with_number =
            b.receipt_canonical("5213017228", "2025-01-15", "45.99", Some("1234"), None);
        assert_eq!(with_number, "5213017228|2025-01-15|45.99|1234");
    }

    #[test]
    fn contract_sorts_parties() {
        let b = builder();
        let ab = b.contract_canonical("5213017228", "9876543210", "2025-01-15", Some("U/1"), None);
        let ba = b.contract_canonical("9876543210", "5213017228", "2025-01-15", Some("U/1"), None);
        assert_eq!(ab, ba);
        assert!(ab.starts_with("5213017228|9876543210|"));
    }

    #[test]
    fn cash_voucher_hides_party_name() {
        let b = builder();
        let canonical =
            b.cash_document_canonical("KP/7", "2025-01-15", "100", None, Some("Jan Kowalski"));
        assert!(!canonical.to_uppercase().contains("KOWALSKI"));

        // Digest is case- and padding-insensitive.
        let shouty =
            b.cash_document_canonical("KP/7", "2025-01-15", "100", None, Some("  jan kowalski "));
        assert_eq!(canonical, shouty);
    }

    #[test]
    fn bank_statement_keeps_digits_only() {
        let canonical = builder().bank_statement_canonical(
            "PL 61 1090 1014 0000 0712 1981 2874",
            "2025-01-31",
            Some("1/2025"),
        );
        assert_eq!(canonical, "61109010140000071219812874|2025-01-31|1/2025");
    }

    #[test]
    fn generic_recipe_truncates_seed_and_verifies() {
        let b = builder();
        let seed = "a".repeat(80);
        let canonical = b.generic_canonical(&seed, Some("2025-01-15"), None);
        assert!(canonical.starts_with(&"a".repeat(64)));
        assert!(!canonical.starts_with(&"a".repeat(65)));

        let id = b.generic(DocumentKind::Other, &seed, Some("2025-01-15"), None);
        assert!(b.verify(id.as_str(), &canonical));
    }

    #[test]
    fn verify_rejects_wrong_canonical() {
        let b = builder();
        let id = b.invoice("5213017228", "FV/1", "2025-01-15", "10");
        let canonical = b.invoice_canonical("5213017228", "FV/1", "2025-01-15", "10");
        assert!(b.verify(id.as_str(), &canonical));
        assert!(!b.verify(id.as_str(), "5213017228|FV/2|2025-01-15|10.00"));
        assert!(!b.verify("not-an-id", &canonical));
    }

    #[test]
    fn single_field_changes_move_the_identifier() {
        let b = builder();
        let base = b.invoice("5213017228", "FV/2025/00142", "2025-01-15", "1230.50");
        let variants = [
            b.invoice("5213017227", "FV/2025/00142", "2025-01-15", "1230.50"),
            b.invoice("5213017228", "FV/2025/00143", "2025-01-15", "1230.50"),
            b.invoice("5213017228", "FV/2025/00142", "2025-01-16", "1230.50"),
            b.invoice("5213017228", "FV/2025/00142", "2025-01-15", "1230.51"),
        ];
        for variant in variants {
            assert_ne!(base, variant);
        }
    }
}
