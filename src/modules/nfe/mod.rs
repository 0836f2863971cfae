//! NFe import and reconciliation: XML tag extraction, duplicata persistence
//! and the client side of the server-side reconciliation procedure.

pub mod models;
pub mod services;

pub use models::{Duplicata, NfeDocument, NfeTotals};
pub use services::{ImportOutcome, NfeImportService, NfeXmlParser, ReconciliationService};
