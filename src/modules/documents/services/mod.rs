pub mod br_doc;

pub use br_doc::{
    cnpj_is_valid, cpf_is_valid, format_cnpj, format_cpf, only_digits, smart_format_cpf_cnpj,
    validate_cpf_cnpj_or_empty,
};
