pub mod nfe_document;

pub use nfe_document::{Duplicata, NfeDocument, NfeTotals};
