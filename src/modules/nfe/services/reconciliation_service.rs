use std::sync::Arc;

use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::gateways::services::backend_trait::{
    ConciliarNfeRequest, ConciliarNfeResponse, GerarRecorrentesRequest, GerarRecorrentesResponse,
    RpcGateway,
};
use crate::modules::nfe::services::xml_parser::CHAVE_ACESSO_LEN;

/// Thin client of the server-side reconciliation procedures. Matching an NFe
/// to a payable happens in the backend; this only shapes and relays the call.
pub struct ReconciliationService {
    rpc: Arc<dyn RpcGateway>,
}

impl ReconciliationService {
    pub fn new(rpc: Arc<dyn RpcGateway>) -> Self {
        Self { rpc }
    }

    /// Reconciles an NFe against an existing payable (`conta_id`) or asks
    /// the backend to create one (`criar_conta`).
    pub async fn conciliar(
        &self,
        chave: &str,
        conta_id: Option<i64>,
        criar_conta: bool,
    ) -> Result<ConciliarNfeResponse> {
        if chave.len() != CHAVE_ACESSO_LEN || !chave.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::validation("Access key must be 44 digits"));
        }
        if conta_id.is_some() && criar_conta {
            return Err(AppError::validation(
                "Choose either an existing payable or payable creation, not both",
            ));
        }

        let response = self
            .rpc
            .conciliar_nfe(ConciliarNfeRequest {
                chave: chave.to_string(),
                conta_id,
                criar_conta,
            })
            .await?;

        info!(
            "NFe {} reconciled (ok={}, conta_id={:?})",
            chave, response.ok, response.conta_id
        );
        Ok(response)
    }

    /// Triggers the server-side recurring-charge generator.
    pub async fn gerar_recorrentes(
        &self,
        request: GerarRecorrentesRequest,
    ) -> Result<GerarRecorrentesResponse> {
        let response = self.rpc.gerar_recorrentes(request).await?;
        info!("Recurring generator created {} charge(s)", response.geradas);
        Ok(response)
    }
}
