use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::gateways::services::backend_trait::{StorageGateway, TableFilter, TableGateway};
use crate::modules::installments::models::Installment;
use crate::modules::installments::services::InstallmentCalculator;
use crate::modules::nfe::models::{Duplicata, NfeDocument};
use crate::modules::nfe::services::xml_parser::{NfeXmlParser, CHAVE_ACESSO_LEN};

/// Table holding one row per imported NFe, keyed by access key
const NFE_TABLE: &str = "nfe_data";
/// Table holding the duplicatas of each NFe
const DUPLICATAS_TABLE: &str = "nfe_duplicatas";

/// What an import produced
#[derive(Debug)]
pub enum ImportOutcome {
    /// Document and its duplicatas are stored
    Imported { document: NfeDocument, duplicatas: usize },
    /// Document is stored but the XML carried no duplicatas; the caller must
    /// collect a manual schedule and persist it via `save_manual_schedule`
    NeedsManualSchedule { document: NfeDocument },
}

/// Imports NFe XML files: archives the raw XML, upserts the document row and
/// replaces the duplicata rows for its access key.
pub struct NfeImportService {
    tables: Arc<dyn TableGateway>,
    storage: Arc<dyn StorageGateway>,
    bucket: String,
}

impl NfeImportService {
    pub fn new(
        tables: Arc<dyn TableGateway>,
        storage: Arc<dyn StorageGateway>,
        bucket: impl Into<String>,
    ) -> Self {
        Self { tables, storage, bucket: bucket.into() }
    }

    /// Imports one NFe from its XML text.
    ///
    /// Always replaces whatever duplicatas were previously stored for the
    /// access key; a re-import never merges with edited rows.
    pub async fn import(&self, xml_text: &str) -> Result<ImportOutcome> {
        let document = NfeXmlParser::parse(xml_text)?;
        let chave = document.chave_acesso.clone();

        let xml_path = format!("xml/{}.xml", chave);
        match self
            .storage
            .upload(&self.bucket, &xml_path, xml_text.as_bytes(), true)
            .await
        {
            Ok(()) => {}
            // a previously archived copy of the same key is fine
            Err(AppError::Gateway(msg)) if msg.contains("already exists") => {
                warn!("XML for key {} already archived, keeping existing object", chave);
            }
            Err(e) => return Err(e),
        }

        self.tables
            .upsert(NFE_TABLE, &document.to_row(&xml_path)?, "chave_acesso")
            .await?;
        self.tables
            .delete(DUPLICATAS_TABLE, &TableFilter::eq("chave_acesso", chave.as_str()))
            .await?;

        if document.duplicatas.is_empty() {
            info!("NFe {} imported without duplicatas, manual schedule required", chave);
            return Ok(ImportOutcome::NeedsManualSchedule { document });
        }

        let rows: Vec<_> = document
            .duplicatas
            .iter()
            .enumerate()
            .map(|(i, dup)| dup.to_row(&chave, i))
            .collect();
        self.tables.insert(DUPLICATAS_TABLE, &rows).await?;

        info!("NFe {} imported with {} duplicata(s)", chave, rows.len());
        let duplicatas = rows.len();
        Ok(ImportOutcome::Imported { document, duplicatas })
    }

    /// Builds the default manual schedule for a document imported without
    /// duplicatas: equal split of the document total, starting at the
    /// emission date (or `fallback_date` when the XML had none).
    pub fn manual_schedule(
        document: &NfeDocument,
        count: u32,
        fallback_date: NaiveDate,
        settled: bool,
    ) -> Result<Vec<Installment>> {
        let first_due = document.data_emissao.unwrap_or(fallback_date);
        InstallmentCalculator::generate(document.totals.total, count, first_due, settled)
    }

    /// Persists a manually entered schedule, replacing every duplicata row
    /// stored for the access key.
    pub async fn save_manual_schedule(
        &self,
        chave_acesso: &str,
        installments: &[Installment],
    ) -> Result<usize> {
        if chave_acesso.len() != CHAVE_ACESSO_LEN {
            return Err(AppError::validation("Access key must be 44 digits"));
        }
        if installments.is_empty() {
            return Err(AppError::validation("Manual schedule cannot be empty"));
        }

        self.tables
            .delete(DUPLICATAS_TABLE, &TableFilter::eq("chave_acesso", chave_acesso))
            .await?;

        let rows: Vec<_> = installments
            .iter()
            .enumerate()
            .map(|(i, installment)| Duplicata::from_installment(installment).to_row(chave_acesso, i))
            .collect();
        self.tables.insert(DUPLICATAS_TABLE, &rows).await?;

        info!("Stored {} manual duplicata(s) for key {}", rows.len(), chave_acesso);
        Ok(rows.len())
    }

    /// Duplicatas currently stored for an access key
    pub async fn stored_duplicatas(&self, chave_acesso: &str) -> Result<Vec<serde_json::Value>> {
        self.tables
            .select(DUPLICATAS_TABLE, &[TableFilter::eq("chave_acesso", chave_acesso)])
            .await
    }
}
