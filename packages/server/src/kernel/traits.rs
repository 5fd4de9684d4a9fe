// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Validation, derived fields and delete protection live in domains::resources;
// stores only persist and query what they are handed.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore, BaseBlobStore)

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use crate::common::DocumentId;
use crate::domains::resources::models::Document;

// =============================================================================
// Document Store (Infrastructure - one logical collection per resource type)
// =============================================================================

/// Case-insensitive substring match OR-ed across `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    pub term: String,
    pub fields: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// `created_at DESC, id DESC`
    NewestFirst,
    /// Sort on a stored field; missing values go last, ties fall back to newest first.
    Field {
        name: &'static str,
        numeric: bool,
        descending: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Exact match on the `status` field.
    pub status: Option<String>,
    pub search: Option<TextSearch>,
    pub sort: SortKey,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub items: Vec<Document>,
    /// Matches before `limit` was applied.
    pub total: i64,
}

/// `collection` items whose `field` equals `value` block a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCheck {
    pub collection: &'static str,
    pub field: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    /// Refused; carries the number of referencing items.
    Referenced(i64),
}

#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Persist a new document and return it as stored.
    async fn insert(&self, collection: &str, doc: &Document) -> Result<Document>;

    async fn find(&self, collection: &str, id: DocumentId) -> Result<Option<Document>>;

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<ListPage>;

    /// Overwrite fields and `updated_at` of an existing document, except the
    /// `keep_stored` keys, which keep their stored values.
    /// Returns None if the document does not exist.
    async fn replace(
        &self,
        collection: &str,
        doc: &Document,
        keep_stored: &[&str],
    ) -> Result<Option<Document>>;

    /// Atomically add one to an integer field and return the updated document.
    async fn increment(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
    ) -> Result<Option<Document>>;

    /// Count documents whose `field` equals `value` (compared as text).
    async fn count_matching(&self, collection: &str, field: &str, value: &str) -> Result<i64>;

    /// Delete unless any check finds a referencing document, as one atomic step.
    async fn delete_unreferenced(
        &self,
        collection: &str,
        id: DocumentId,
        checks: &[ReferenceCheck],
    ) -> Result<DeleteOutcome>;

    /// Next value of a per-collection counter; never below the largest stored value + 1.
    async fn next_sequence(&self, collection: &str, field: &str) -> Result<i64>;

    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// Blob Store (Infrastructure - uploaded files)
// =============================================================================

/// Reference to an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBlob {
    /// SHA-256 of the bytes.
    pub id: String,
    pub content_type: String,
    pub size_bytes: i64,
}

impl StoredBlob {
    /// Path clients store in binary fields.
    pub fn url(&self) -> String {
        format!("/api/files/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct Blob {
    pub meta: StoredBlob,
    pub bytes: Bytes,
}

#[async_trait]
pub trait BaseBlobStore: Send + Sync {
    /// Store bytes under their content address. Storing the same bytes twice is a no-op.
    async fn put(&self, content_type: &str, bytes: Bytes) -> Result<StoredBlob>;

    async fn get(&self, id: &str) -> Result<Option<Blob>>;
}
