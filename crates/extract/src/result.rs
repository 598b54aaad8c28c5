//! Extraction output types.

use canonical::DocumentKind;
use serde::{Deserialize, Serialize};

/// Classification produced by the extraction layer.
///
/// A narrower set than [`DocumentKind`]: only the kinds with a dedicated
/// extractor appear here, everything else is `Unknown` and maps to
/// [`DocumentKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentCategory {
    Invoice,
    Receipt,
    Contract,
    BankStatement,
    Unknown,
}

impl DocumentCategory {
    /// The document kind this category resolves to.
    pub fn kind(self) -> DocumentKind {
        match self {
            DocumentCategory::Invoice => DocumentKind::Invoice,
            DocumentCategory::Receipt => DocumentKind::Receipt,
            DocumentCategory::Contract => DocumentKind::Contract,
            DocumentCategory::BankStatement => DocumentKind::BankStatement,
            DocumentCategory::Unknown => DocumentKind::Other,
        }
    }
}

/// Fields recovered from one document.
///
/// Every field is optional; a missing field collapses to an empty canonical
/// segment downstream. Which fields are populated depends on the category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Classification this result was produced under.
    pub category: DocumentCategory,
    /// Confidence carried through from the evidence (or, in ranked
    /// diagnostics, the scorer's confidence).
    pub confidence: f32,

    // Shared fields.
    pub document_date: Option<String>,
    pub issuer_tax_id: Option<String>,

    // Invoice fields.
    pub invoice_number: Option<String>,
    pub buyer_tax_id: Option<String>,
    pub gross_amount: Option<String>,
    pub net_amount: Option<String>,
    pub vat_amount: Option<String>,

    // Receipt fields.
    pub receipt_number: Option<String>,
    pub cash_register_number: Option<String>,

    // Contract fields.
    pub contract_number: Option<String>,
    pub second_party_tax_id: Option<String>,
    pub contract_type: Option<String>,

    // Bank-statement fields.
    pub account_number: Option<String>,
    pub statement_number: Option<String>,

    /// The full recognized text the fields were pulled from.
    pub raw_text: Option<String>,
}

impl ExtractionResult {
    /// An empty result for the given category and confidence.
    pub fn empty(category: DocumentCategory, confidence: f32) -> ExtractionResult {
        ExtractionResult {
            category,
            confidence,
            document_date: None,
            issuer_tax_id: None,
            invoice_number: None,
            buyer_tax_id: None,
            gross_amount: None,
            net_amount: None,
            vat_amount: None,
            receipt_number: None,
            cash_register_number: None,
            contract_number: None,
            second_party_tax_id: None,
            contract_type: None,
            account_number: None,
            statement_number: None,
            raw_text: None,
        }
    }
}
