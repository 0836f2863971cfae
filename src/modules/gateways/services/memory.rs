//! In-memory backend double.
//!
//! Implements the gateway traits over plain maps so services can run without
//! a live backend. Used by the integration tests; also handy for offline
//! experiments.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use crate::core::{AppError, Result};

use super::backend_trait::{
    AuthGateway, ConciliarNfeRequest, ConciliarNfeResponse, EnsurePapelRequest,
    GerarRecorrentesRequest, GerarRecorrentesResponse, RpcGateway, Session, StorageGateway,
    StorageObject, TableFilter, TableGateway,
};

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    session: Mutex<Option<Session>>,
    /// Reconciliation calls received, oldest first
    pub conciliar_calls: Mutex<Vec<ConciliarNfeRequest>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a table's rows (empty if the table was never written)
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(&object_key(bucket, path)).cloned()
    }

    fn matches(row: &Value, filter: &TableFilter) -> bool {
        row.get(&filter.column) == Some(&filter.value)
    }
}

fn object_key(bucket: &str, path: &str) -> String {
    format!("{}/{}", bucket, path)
}

#[async_trait]
impl TableGateway for MemoryBackend {
    async fn select(&self, table: &str, filters: &[TableFilter]) -> Result<Vec<Value>> {
        let tables = self.tables.lock().unwrap();
        let rows = tables.get(table).cloned().unwrap_or_default();
        Ok(rows
            .into_iter()
            .filter(|row| filters.iter().all(|f| Self::matches(row, f)))
            .collect())
    }

    async fn insert(&self, table: &str, rows: &[Value]) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        tables.entry(table.to_string()).or_default().extend(rows.iter().cloned());
        Ok(())
    }

    async fn update(&self, table: &str, filter: &TableFilter, patch: &Value) -> Result<()> {
        let patch_map = patch
            .as_object()
            .ok_or_else(|| AppError::gateway("Update patch must be a JSON object"))?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| Self::matches(row, filter)) {
                if let Some(map) = row.as_object_mut() {
                    for (k, v) in patch_map {
                        map.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filter: &TableFilter) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !Self::matches(row, filter));
        }
        Ok(())
    }

    async fn upsert(&self, table: &str, row: &Value, on_conflict: &str) -> Result<()> {
        let key = row
            .get(on_conflict)
            .cloned()
            .ok_or_else(|| AppError::gateway(format!("Upsert row missing key {}", on_conflict)))?;
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        match rows.iter_mut().find(|r| r.get(on_conflict) == Some(&key)) {
            Some(existing) => *existing = row.clone(),
            None => rows.push(row.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl RpcGateway for MemoryBackend {
    async fn conciliar_nfe(&self, request: ConciliarNfeRequest) -> Result<ConciliarNfeResponse> {
        let conta_id = request.conta_id.or(if request.criar_conta { Some(1) } else { None });
        self.conciliar_calls.lock().unwrap().push(request);
        Ok(ConciliarNfeResponse { ok: true, conta_id, message: Some("conciliada".to_string()) })
    }

    async fn ensure_papel(&self, _request: EnsurePapelRequest) -> Result<()> {
        Ok(())
    }

    async fn gerar_recorrentes(
        &self,
        _request: GerarRecorrentesRequest,
    ) -> Result<GerarRecorrentesResponse> {
        Ok(GerarRecorrentesResponse { geradas: 0 })
    }
}

#[async_trait]
impl StorageGateway for MemoryBackend {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<StorageObject>> {
        let full_prefix = object_key(bucket, prefix);
        let objects = self.objects.lock().unwrap();
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(&full_prefix))
            .map(|(key, bytes)| StorageObject {
                name: key.trim_start_matches(&format!("{}/", bucket)).to_string(),
                size: Some(bytes.len() as u64),
                updated_at: Some(Utc::now()),
            })
            .collect())
    }

    async fn upload(&self, bucket: &str, path: &str, bytes: &[u8], upsert: bool) -> Result<()> {
        let key = object_key(bucket, path);
        let mut objects = self.objects.lock().unwrap();
        if !upsert && objects.contains_key(&key) {
            return Err(AppError::gateway("The resource already exists"));
        }
        objects.insert(key, bytes.to_vec());
        Ok(())
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<()> {
        let key = object_key(bucket, path);
        let mut objects = self.objects.lock().unwrap();
        objects
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(key))
    }

    async fn signed_url(&self, bucket: &str, path: &str, expires_secs: u32) -> Result<String> {
        let key = object_key(bucket, path);
        let objects = self.objects.lock().unwrap();
        if !objects.contains_key(&key) {
            return Err(AppError::not_found(key));
        }
        Ok(format!("memory://{}?expires={}", key, expires_secs))
    }
}

#[async_trait]
impl AuthGateway for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::unauthorized("Invalid credentials"));
        }
        let session = Session {
            user_id: format!("user-{}", email),
            email: email.to_string(),
            access_token: "memory-token".to_string(),
            expires_at: None,
        };
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn session(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().unwrap().clone())
    }
}
