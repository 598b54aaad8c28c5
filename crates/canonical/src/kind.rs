//! The closed set of supported document kinds and their wire codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Business-document classes recognized by the pipeline.
///
/// Each variant carries a fixed two- or three-letter code that appears in the
/// middle segment of every identifier. The codes follow Polish accounting
/// shorthand (FV = faktura VAT, PAR = paragon, KP = kasa przyjmie, ...).
/// They are wire format: renaming a code silently changes every identifier
/// ever issued for that kind, so the enum is deliberately closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Faktura VAT.
    Invoice,
    /// Paragon fiskalny.
    Receipt,
    /// Umowa.
    Contract,
    /// Wyciąg bankowy.
    BankStatement,
    /// Faktura korygująca.
    Correction,
    /// Faktura proforma.
    Proforma,
    /// Faktura zaliczkowa.
    Advance,
    /// Rachunek (bez VAT).
    Bill,
    /// Kasa przyjmie (dowód wpłaty).
    CashIn,
    /// Kasa wyda (dowód wypłaty).
    CashOut,
    /// Nota księgowa.
    DebitNote,
    /// Wydanie zewnętrzne.
    DeliveryNote,
    /// Przyjęcie zewnętrzne.
    ReceiptNote,
    /// Delegacja / rozliczenie kosztów.
    ExpenseReport,
    /// Any other document.
    Other,
}

impl DocumentKind {
    /// Every kind, in declaration order. Declaration order is also the
    /// classifier tie-break order.
    pub const ALL: [DocumentKind; 15] = [
        DocumentKind::Invoice,
        DocumentKind::Receipt,
        DocumentKind::Contract,
        DocumentKind::BankStatement,
        DocumentKind::Correction,
        DocumentKind::Proforma,
        DocumentKind::Advance,
        DocumentKind::Bill,
        DocumentKind::CashIn,
        DocumentKind::CashOut,
        DocumentKind::DebitNote,
        DocumentKind::DeliveryNote,
        DocumentKind::ReceiptNote,
        DocumentKind::ExpenseReport,
        DocumentKind::Other,
    ];

    /// The fixed identifier code for this kind.
    pub fn code(self) -> &'static str {
        match self {
            DocumentKind::Invoice => "FV",
            DocumentKind::Receipt => "PAR",
            DocumentKind::Contract => "UMO",
            DocumentKind::BankStatement => "WB",
            DocumentKind::Correction => "KOR",
            DocumentKind::Proforma => "PRO",
            DocumentKind::Advance => "ZAL",
            DocumentKind::Bill => "RAC",
            DocumentKind::CashIn => "KP",
            DocumentKind::CashOut => "KW",
            DocumentKind::DebitNote => "NK",
            DocumentKind::DeliveryNote => "WZ",
            DocumentKind::ReceiptNote => "PZ",
            DocumentKind::ExpenseReport => "DEL",
            DocumentKind::Other => "DOC",
        }
    }

    /// Resolve a wire code back to its kind.
    pub fn from_code(code: &str) -> Option<DocumentKind> {
        DocumentKind::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        for a in DocumentKind::ALL {
            for b in DocumentKind::ALL {
                if a != b {
                    assert_ne!(a.code(), b.code());
                }
            }
        }
    }

    #[test]
    fn codes_fit_the_wire_grammar() {
        for kind in DocumentKind::ALL {
            let code = kind.code();
            assert!((2..=3).contains(&code.len()), "{code}");
            assert!(code.bytes().all(|b| b.is_ascii_uppercase()), "{code}");
        }
    }

    #[test]
    fn display_matches_code() {
        assert_eq!(DocumentKind::Invoice.to_string(), "FV");
        assert_eq!(DocumentKind::CashOut.to_string(), "KW");
    }
}
