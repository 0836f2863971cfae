//! CPF/CNPJ utilities: normalize, validate and format Brazilian tax documents.
//!
//! All functions here are total: malformed input degrades to `false` or to a
//! partially punctuated string, never to an error.

use crate::modules::documents::models::{DocumentCheck, DocumentKind};

/// CNPJ weight table for the first check digit (applied to the 12 base digits)
const CNPJ_WEIGHTS_1: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
/// CNPJ weight table for the second check digit (applied to 13 digits)
const CNPJ_WEIGHTS_2: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Strips every non-digit character. Never fails; empty input yields "".
pub fn only_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Formats up to 11 digits as a CPF, inserting punctuation progressively:
/// `123` -> `123`, `1234` -> `123.4`, full input -> `123.456.789-01`.
/// Input beyond 11 digits is silently truncated.
pub fn format_cpf(digits: &str) -> String {
    let normalized = only_digits(digits);
    let mut out = String::with_capacity(14);
    for (i, c) in normalized.chars().take(11).enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Formats up to 14 digits as a CNPJ with the same progressive contract,
/// full pattern `12.345.678/0001-95`.
pub fn format_cnpj(digits: &str) -> String {
    let normalized = only_digits(digits);
    let mut out = String::with_capacity(18);
    for (i, c) in normalized.chars().take(14).enumerate() {
        match i {
            2 | 5 => out.push('.'),
            8 => out.push('/'),
            12 => out.push('-'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Formats free text as CPF while it holds at most 11 digits, switching to
/// CNPJ punctuation as the user types past that. Drives live text fields.
pub fn smart_format_cpf_cnpj(raw: &str) -> String {
    let digits = only_digits(raw);
    if digits.len() <= 11 {
        format_cpf(&digits)
    } else {
        format_cnpj(&digits)
    }
}

/// Validates a CPF: exactly 11 digits, not all repeated, both check digits
/// matching the weighted-sum-mod-11 scheme.
pub fn cpf_is_valid(input: &str) -> bool {
    let s = only_digits(input);
    if s.len() != 11 || all_repeated(&s) {
        return false;
    }
    let d: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    let sum1: u32 = d[..9].iter().enumerate().map(|(i, v)| v * (10 - i as u32)).sum();
    let mut dv1 = (sum1 * 10) % 11;
    if dv1 == 10 {
        dv1 = 0;
    }

    let sum2: u32 = d[..10].iter().enumerate().map(|(i, v)| v * (11 - i as u32)).sum();
    let mut dv2 = (sum2 * 10) % 11;
    if dv2 == 10 {
        dv2 = 0;
    }

    dv1 == d[9] && dv2 == d[10]
}

/// Validates a CNPJ: exactly 14 digits, not all repeated, both check digits
/// matching the fixed weight tables.
pub fn cnpj_is_valid(input: &str) -> bool {
    let s = only_digits(input);
    if s.len() != 14 || all_repeated(&s) {
        return false;
    }
    let d: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    let sum1: u32 = d[..12].iter().zip(CNPJ_WEIGHTS_1).map(|(v, w)| v * w).sum();
    let mut dv1 = 11 - (sum1 % 11);
    if dv1 >= 10 {
        dv1 = 0;
    }

    let sum2: u32 = d[..13].iter().zip(CNPJ_WEIGHTS_2).map(|(v, w)| v * w).sum();
    let mut dv2 = 11 - (sum2 % 11);
    if dv2 >= 10 {
        dv2 = 0;
    }

    dv1 == d[12] && dv2 == d[13]
}

/// Classifies and validates free text that may hold a CPF, a CNPJ or nothing.
///
/// Blank input is acceptable (the document field is optional by default);
/// a mandatory field is the caller's concern. Digit counts of 12 and 13 are
/// reported invalid without attempting either checksum.
pub fn validate_cpf_cnpj_or_empty(value: &str) -> DocumentCheck {
    let digits = only_digits(value);
    if digits.is_empty() {
        return DocumentCheck { ok: true, kind: DocumentKind::Empty, digits };
    }
    if digits.len() <= 11 {
        return DocumentCheck { ok: cpf_is_valid(&digits), kind: DocumentKind::Cpf, digits };
    }
    if digits.len() == 14 {
        return DocumentCheck { ok: cnpj_is_valid(&digits), kind: DocumentKind::Cnpj, digits };
    }
    DocumentCheck { ok: false, kind: DocumentKind::Invalid, digits }
}

fn all_repeated(digits: &str) -> bool {
    let mut chars = digits.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}
