// In-process store implementations
//
// Same contract as the Postgres stores, held in memory. Used by the test
// harness and by `cms_admin` dry runs.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{
    BaseBlobStore, BaseDocumentStore, Blob, DeleteOutcome, ListPage, ListQuery, ReferenceCheck,
    SortKey, StoredBlob, TextSearch,
};
use crate::common::utils::content_address;
use crate::common::DocumentId;
use crate::domains::resources::models::{Document, StatusSpec};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex.lock().map_err(|_| anyhow!("memory store lock poisoned"))
}

// =============================================================================
// Memory Document Store
// =============================================================================

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, HashMap<DocumentId, Document>>>,
    sequences: Mutex<HashMap<(String, String), i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn count_in(
        collections: &HashMap<String, HashMap<DocumentId, Document>>,
        collection: &str,
        field: &str,
        value: &str,
    ) -> i64 {
        collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.text_of(field).as_deref() == Some(value))
                    .count() as i64
            })
            .unwrap_or(0)
    }
}

fn matches_search(doc: &Document, search: &TextSearch) -> bool {
    let needle = search.term.to_lowercase();
    search.fields.iter().any(|field| {
        doc.text_of(field)
            .map(|text| text.to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

fn newest_first(a: &Document, b: &Document) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Missing values sort last in either direction.
fn compare_present<T: PartialOrd>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(crate) fn compare_documents(a: &Document, b: &Document, sort: SortKey) -> Ordering {
    match sort {
        SortKey::NewestFirst => newest_first(a, b),
        SortKey::Field {
            name,
            numeric: true,
            descending,
        } => compare_present(a.number_field(name), b.number_field(name), descending)
            .then_with(|| newest_first(a, b)),
        SortKey::Field {
            name,
            numeric: false,
            descending,
        } => compare_present(a.str_field(name), b.str_field(name), descending)
            .then_with(|| newest_first(a, b)),
    }
}

#[async_trait]
impl BaseDocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, doc: &Document) -> Result<Document> {
        let mut collections = lock(&self.collections)?;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&doc.id) {
            return Err(anyhow!("duplicate id {} in {}", doc.id, collection));
        }
        docs.insert(doc.id, doc.clone());
        Ok(doc.clone())
    }

    async fn find(&self, collection: &str, id: DocumentId) -> Result<Option<Document>> {
        let collections = lock(&self.collections)?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(&id))
            .cloned())
    }

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<ListPage> {
        let collections = lock(&self.collections)?;
        let mut items: Vec<Document> = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| match &query.status {
                        Some(status) => doc.str_field(StatusSpec::FIELD) == Some(status.as_str()),
                        None => true,
                    })
                    .filter(|doc| match &query.search {
                        Some(search) => matches_search(doc, search),
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        items.sort_by(|a, b| compare_documents(a, b, query.sort));
        let total = items.len() as i64;
        items.truncate(query.limit.max(0) as usize);

        Ok(ListPage { items, total })
    }

    async fn replace(
        &self,
        collection: &str,
        doc: &Document,
        keep_stored: &[&str],
    ) -> Result<Option<Document>> {
        let mut collections = lock(&self.collections)?;
        let Some(existing) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&doc.id))
        else {
            return Ok(None);
        };
        let mut fields = doc.fields.clone();
        for key in keep_stored {
            match existing.fields.remove(*key) {
                Some(value) => fields.insert(key.to_string(), value),
                None => fields.remove(*key),
            };
        }
        existing.fields = fields;
        existing.updated_at = doc.updated_at;
        Ok(Some(existing.clone()))
    }

    async fn increment(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
    ) -> Result<Option<Document>> {
        let mut collections = lock(&self.collections)?;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&id))
        else {
            return Ok(None);
        };
        let current = doc.get(field).and_then(|v| v.as_i64()).unwrap_or(0);
        doc.fields.insert(field.to_string(), (current + 1).into());
        Ok(Some(doc.clone()))
    }

    async fn count_matching(&self, collection: &str, field: &str, value: &str) -> Result<i64> {
        let collections = lock(&self.collections)?;
        Ok(Self::count_in(&collections, collection, field, value))
    }

    async fn delete_unreferenced(
        &self,
        collection: &str,
        id: DocumentId,
        checks: &[ReferenceCheck],
    ) -> Result<DeleteOutcome> {
        let mut collections = lock(&self.collections)?;
        let exists = collections
            .get(collection)
            .map(|docs| docs.contains_key(&id))
            .unwrap_or(false);
        if !exists {
            return Ok(DeleteOutcome::NotFound);
        }

        let referencing: i64 = checks
            .iter()
            .map(|check| Self::count_in(&collections, check.collection, check.field, &check.value))
            .sum();
        if referencing > 0 {
            return Ok(DeleteOutcome::Referenced(referencing));
        }

        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(&id);
        }
        Ok(DeleteOutcome::Deleted)
    }

    async fn next_sequence(&self, collection: &str, field: &str) -> Result<i64> {
        let stored_max = {
            let collections = lock(&self.collections)?;
            collections
                .get(collection)
                .and_then(|docs| {
                    docs.values()
                        .filter_map(|doc| doc.get(field).and_then(Value::as_i64))
                        .max()
                })
                .unwrap_or(0)
        };

        let mut sequences = lock(&self.sequences)?;
        let counter = sequences
            .entry((collection.to_string(), field.to_string()))
            .or_insert(0);
        let next = counter
            .checked_add(1)
            .zip(stored_max.checked_add(1))
            .map(|(a, b)| a.max(b))
            .ok_or_else(|| anyhow!("sequence {collection}.{field} is exhausted"))?;
        *counter = next;
        Ok(next)
    }

    async fn ping(&self) -> Result<()> {
        lock(&self.collections).map(|_| ())
    }
}

// =============================================================================
// Memory Blob Store
// =============================================================================

#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Blob>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseBlobStore for MemoryBlobStore {
    async fn put(&self, content_type: &str, bytes: Bytes) -> Result<StoredBlob> {
        let meta = StoredBlob {
            id: content_address(&bytes),
            content_type: content_type.to_string(),
            size_bytes: bytes.len() as i64,
        };
        let mut blobs = lock(&self.blobs)?;
        let stored = blobs.entry(meta.id.clone()).or_insert_with(|| Blob {
            meta: meta.clone(),
            bytes,
        });
        Ok(stored.meta.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Blob>> {
        Ok(lock(&self.blobs)?.get(id).cloned())
    }
}
