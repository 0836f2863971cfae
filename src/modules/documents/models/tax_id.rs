use serde::{Deserialize, Serialize};

use crate::modules::documents::services::br_doc;

/// Classification of a tax-document field by digit count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    /// No digits at all; acceptable for optional fields
    Empty,
    /// 1 to 11 digits; validated as a natural-person document
    Cpf,
    /// Exactly 14 digits; validated as a legal-entity document
    Cnpj,
    /// 12, 13 or more than 14 digits; never checksummed
    Invalid,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
            Self::Invalid => "INVALID",
        }
    }

    /// Kind implied by a digits-only string, before any checksum runs.
    pub fn from_digits(digits: &str) -> Self {
        match digits.len() {
            0 => Self::Empty,
            1..=11 => Self::Cpf,
            14 => Self::Cnpj,
            _ => Self::Invalid,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured outcome of validating an optional CPF/CNPJ field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCheck {
    pub ok: bool,
    pub kind: DocumentKind,
    pub digits: String,
}

/// A tax identifier as entered in a form field.
///
/// Rebuilt from the raw text on every keystroke; formatting depends only on
/// the normalized digits and the detected kind, never on the punctuation the
/// user happened to type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxId {
    pub raw_input: String,
    pub digits: String,
    pub kind: DocumentKind,
    pub is_valid: bool,
}

impl TaxId {
    pub fn parse(raw: &str) -> Self {
        let digits = br_doc::only_digits(raw);
        let kind = DocumentKind::from_digits(&digits);
        let is_valid = match kind {
            DocumentKind::Empty => true,
            DocumentKind::Cpf => br_doc::cpf_is_valid(&digits),
            DocumentKind::Cnpj => br_doc::cnpj_is_valid(&digits),
            DocumentKind::Invalid => false,
        };
        Self { raw_input: raw.to_string(), digits, kind, is_valid }
    }

    /// Canonical punctuated display form for the detected kind.
    pub fn formatted(&self) -> String {
        match self.kind {
            DocumentKind::Cpf => br_doc::format_cpf(&self.digits),
            DocumentKind::Cnpj => br_doc::format_cnpj(&self.digits),
            DocumentKind::Empty | DocumentKind::Invalid => self.digits.clone(),
        }
    }
}
