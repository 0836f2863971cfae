pub mod backend_trait;
pub mod memory;

pub use backend_trait::{
    AuthGateway, ConciliarNfeRequest, ConciliarNfeResponse, EnsurePapelRequest,
    GerarRecorrentesRequest, GerarRecorrentesResponse, RpcGateway, Session, StorageGateway,
    StorageObject, TableFilter, TableGateway,
};
pub use memory::MemoryBackend;
