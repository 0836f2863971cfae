use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::Result;

/// Equality filter applied to a table column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableFilter {
    pub column: String,
    pub value: Value,
}

impl TableFilter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { column: column.into(), value: value.into() }
    }
}

/// Row-oriented access to the hosted backend's tables.
///
/// Rows cross this seam as JSON objects; the backend owns all query planning
/// and row-level security. Implementations must treat `upsert` as
/// insert-or-replace keyed on the `on_conflict` column.
#[async_trait]
pub trait TableGateway: Send + Sync {
    async fn select(&self, table: &str, filters: &[TableFilter]) -> Result<Vec<Value>>;

    async fn insert(&self, table: &str, rows: &[Value]) -> Result<()>;

    async fn update(&self, table: &str, filter: &TableFilter, patch: &Value) -> Result<()>;

    async fn delete(&self, table: &str, filter: &TableFilter) -> Result<()>;

    async fn upsert(&self, table: &str, row: &Value, on_conflict: &str) -> Result<()>;
}

/// Request for the server-side NFe reconciliation procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConciliarNfeRequest {
    /// 44-digit NFe access key
    pub chave: String,
    /// Existing payable to link to, when not creating one
    pub conta_id: Option<i64>,
    /// Create a payable from the NFe instead of linking
    pub criar_conta: bool,
}

/// Outcome reported by the reconciliation procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConciliarNfeResponse {
    pub ok: bool,
    /// Payable the NFe ended up linked to
    pub conta_id: Option<i64>,
    pub message: Option<String>,
}

/// Request for the server-side role-assignment procedure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsurePapelRequest {
    pub pessoa_id: i64,
    pub papel: String,
}

/// Request for the server-side recurring-charge generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GerarRecorrentesRequest {
    /// Competence month to generate for; backend defaults to the current one
    pub competencia: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GerarRecorrentesResponse {
    /// Number of charges created in this run
    pub geradas: u32,
}

/// Server-side business procedures, one typed call per operation.
///
/// The procedure bodies live in the backend; this crate only carries their
/// request/response shapes.
#[async_trait]
pub trait RpcGateway: Send + Sync {
    async fn conciliar_nfe(&self, request: ConciliarNfeRequest) -> Result<ConciliarNfeResponse>;

    async fn ensure_papel(&self, request: EnsurePapelRequest) -> Result<()>;

    async fn gerar_recorrentes(
        &self,
        request: GerarRecorrentesRequest,
    ) -> Result<GerarRecorrentesResponse>;
}

/// Object listed from a storage bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageObject {
    pub name: String,
    pub size: Option<u64>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// File-object storage (XML archives, payable attachments)
#[async_trait]
pub trait StorageGateway: Send + Sync {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageObject>>;

    /// Uploads `bytes` at `path`. With `upsert` set an existing object is
    /// replaced instead of failing.
    async fn upload(&self, bucket: &str, path: &str, bytes: &[u8], upsert: bool) -> Result<()>;

    async fn remove(&self, bucket: &str, path: &str) -> Result<()>;

    async fn signed_url(&self, bucket: &str, path: &str, expires_secs: u32) -> Result<String>;
}

/// Authenticated session issued by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Session-based authentication
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_out(&self) -> Result<()>;

    async fn session(&self) -> Result<Option<Session>>;
}
