//! Core library of a Brazilian accounts-payable back office.
//!
//! The hosted backend owns storage, auth and the transactional procedures;
//! what lives here is the logic that must be exact on the client side:
//! CPF/CNPJ identity, penny-exact installment schedules, NFe XML import and
//! the typed contracts for the backend seams.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::documents;
pub use modules::gateways;
pub use modules::installments;
pub use modules::nfe;
