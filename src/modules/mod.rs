pub mod documents;
pub mod gateways;
pub mod installments;
pub mod nfe;
