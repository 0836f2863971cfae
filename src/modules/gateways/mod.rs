//! Contracts for the hosted backend this application delegates to: table
//! rows, server-side procedures, object storage and sessions. Only the
//! shapes live here; the behavior is the backend's.

pub mod services;

pub use services::{
    AuthGateway, ConciliarNfeRequest, ConciliarNfeResponse, EnsurePapelRequest,
    GerarRecorrentesRequest, GerarRecorrentesResponse, MemoryBackend, RpcGateway, Session,
    StorageGateway, StorageObject, TableFilter, TableGateway,
};
