//! Server dependencies (using traits for testability)
//!
//! Central container handed to every route. Storage sits behind the
//! `Base*` traits so tests run against the in-memory stores.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::{
    BaseBlobStore, BaseDocumentStore, MemoryBlobStore, MemoryStore, PostgresBlobStore,
    PostgresStore,
};

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseDocumentStore>,
    pub blobs: Arc<dyn BaseBlobStore>,
    /// JWT service for token verification
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseDocumentStore>,
        blobs: Arc<dyn BaseBlobStore>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            store,
            blobs,
            jwt_service,
        }
    }

    /// Postgres-backed documents and blobs sharing one pool.
    pub fn postgres(pool: PgPool, jwt_service: Arc<JwtService>) -> Self {
        Self::new(
            Arc::new(PostgresStore::new(pool.clone())),
            Arc::new(PostgresBlobStore::new(pool)),
            jwt_service,
        )
    }

    pub fn in_memory(jwt_service: Arc<JwtService>) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryBlobStore::new()),
            jwt_service,
        )
    }
}
