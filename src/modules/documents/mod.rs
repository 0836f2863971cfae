//! Brazilian tax-document identity: CPF/CNPJ normalization, validation and
//! progressive display formatting.

pub mod models;
pub mod services;

pub use models::{DocumentCheck, DocumentKind, TaxId};
pub use services::{
    cnpj_is_valid, cpf_is_valid, format_cnpj, format_cpf, only_digits, smart_format_cpf_cnpj,
    validate_cpf_cnpj_or_empty,
};
