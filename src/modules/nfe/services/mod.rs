pub mod import_service;
pub mod reconciliation_service;
pub mod xml_parser;

pub use import_service::{ImportOutcome, NfeImportService};
pub use reconciliation_service::ReconciliationService;
pub use xml_parser::NfeXmlParser;
