// Postgres-backed stores
//
// Every resource type shares the `documents` table; `collection` selects the
// logical collection and `data` holds the declared fields as JSONB.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{
    BaseBlobStore, BaseDocumentStore, Blob, DeleteOutcome, ListPage, ListQuery, ReferenceCheck,
    SortKey, StoredBlob, TextSearch,
};
use crate::common::utils::content_address;
use crate::common::DocumentId;
use crate::domains::resources::models::{Document, StatusSpec};

const DOCUMENT_COLUMNS: &str = "id, data, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: DocumentId,
    data: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            fields: row.data.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ListedRow {
    #[sqlx(flatten)]
    document: DocumentRow,
    total_count: i64,
}

/// Escape LIKE wildcards so the term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_search(builder: &mut QueryBuilder<'_, Postgres>, search: &TextSearch) {
    if search.fields.is_empty() {
        builder.push(" AND FALSE");
        return;
    }
    let pattern = like_pattern(&search.term);
    builder.push(" AND (");
    for (i, field) in search.fields.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        builder.push("data->>");
        builder.push_bind(field.to_string());
        builder.push(" ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\'");
    }
    builder.push(")");
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, sort: SortKey) {
    builder.push(" ORDER BY ");
    if let SortKey::Field {
        name,
        numeric,
        descending,
    } = sort
    {
        let (json_type, cast) = if numeric {
            ("number", "::numeric")
        } else {
            ("string", " COLLATE \"C\"")
        };
        builder.push("CASE WHEN jsonb_typeof(data->");
        builder.push_bind(name);
        builder.push(format!(") = '{json_type}' THEN (data->>"));
        builder.push_bind(name);
        builder.push(format!("){cast} END "));
        builder.push(if descending { "DESC" } else { "ASC" });
        builder.push(" NULLS LAST, ");
    }
    builder.push("created_at DESC, id DESC");
}

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseDocumentStore for PostgresStore {
    async fn insert(&self, collection: &str, doc: &Document) -> Result<Document> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "INSERT INTO documents (id, collection, data, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(doc.id)
        .bind(collection)
        .bind(Json(&doc.fields))
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("insert into {collection}"))?;
        Ok(row.into())
    }

    async fn find(&self, collection: &str, id: DocumentId) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE collection = $1 AND id = $2"
        ))
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list(&self, collection: &str, query: &ListQuery) -> Result<ListPage> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {DOCUMENT_COLUMNS}, COUNT(*) OVER() AS total_count FROM documents WHERE collection = "
        ));
        builder.push_bind(collection.to_string());

        if let Some(status) = &query.status {
            builder.push(format!(" AND data->>'{}' = ", StatusSpec::FIELD));
            builder.push_bind(status.clone());
        }
        if let Some(search) = &query.search {
            push_search(&mut builder, search);
        }
        push_order(&mut builder, query.sort);
        builder.push(" LIMIT ");
        builder.push_bind(query.limit);

        let rows: Vec<ListedRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("list {collection}"))?;

        let total = match rows.first() {
            Some(row) => row.total_count,
            // An empty page still needs the unlimited count.
            None => self.count_all(collection, query).await?,
        };

        Ok(ListPage {
            items: rows.into_iter().map(|row| row.document.into()).collect(),
            total,
        })
    }

    async fn replace(
        &self,
        collection: &str,
        doc: &Document,
        keep_stored: &[&str],
    ) -> Result<Option<Document>> {
        // Kept keys are read from the locked row, so concurrent increments survive.
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "UPDATE documents
             SET data = ($3::jsonb - $5::text[]) || COALESCE(
                     (SELECT jsonb_object_agg(k, data->k) FROM unnest($5::text[]) AS k WHERE data ? k),
                     '{{}}'::jsonb
                 ),
                 updated_at = $4
             WHERE collection = $1 AND id = $2
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(collection)
        .bind(doc.id)
        .bind(Json(&doc.fields))
        .bind(doc.updated_at)
        .bind(keep_stored)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn increment(
        &self,
        collection: &str,
        id: DocumentId,
        field: &str,
    ) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(&format!(
            "UPDATE documents
             SET data = jsonb_set(data, ARRAY[$3::text], to_jsonb(COALESCE((data->>$3)::bigint, 0) + 1))
             WHERE collection = $1 AND id = $2
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(collection)
        .bind(id)
        .bind(field)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn count_matching(&self, collection: &str, field: &str, value: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM documents WHERE collection = $1 AND data->>$2 = $3",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn delete_unreferenced(
        &self,
        collection: &str,
        id: DocumentId,
        checks: &[ReferenceCheck],
    ) -> Result<DeleteOutcome> {
        let mut builder = QueryBuilder::<Postgres>::new("WITH referencing AS (SELECT ");
        if checks.is_empty() {
            builder.push("0::bigint");
        }
        for (i, check) in checks.iter().enumerate() {
            if i > 0 {
                builder.push(" + ");
            }
            builder.push("(SELECT COUNT(*) FROM documents WHERE collection = ");
            builder.push_bind(check.collection);
            builder.push(" AND data->>");
            builder.push_bind(check.field);
            builder.push(" = ");
            builder.push_bind(check.value.clone());
            builder.push(")");
        }
        builder.push(" AS n), deleted AS (DELETE FROM documents WHERE collection = ");
        builder.push_bind(collection.to_string());
        builder.push(" AND id = ");
        builder.push_bind(id);
        builder.push(" AND (SELECT n FROM referencing) = 0 RETURNING id)");
        builder.push(" SELECT EXISTS (SELECT 1 FROM documents WHERE collection = ");
        builder.push_bind(collection.to_string());
        builder.push(" AND id = ");
        builder.push_bind(id);
        builder.push("), (SELECT n FROM referencing), (SELECT COUNT(*) FROM deleted)");

        let (present, referencing, deleted): (bool, i64, i64) = builder
            .build_query_as()
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("delete from {collection}"))?;

        Ok(if !present {
            DeleteOutcome::NotFound
        } else if deleted > 0 {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Referenced(referencing)
        })
    }

    async fn next_sequence(&self, collection: &str, field: &str) -> Result<i64> {
        let value = sqlx::query_scalar::<_, i64>(
            "INSERT INTO sequences (collection, field, value)
             VALUES ($1, $2, COALESCE((
                 SELECT MAX(n)::bigint FROM (
                     SELECT (data->>$2)::numeric AS n FROM documents
                     WHERE collection = $1 AND jsonb_typeof(data->$2) = 'number'
                 ) stored
                 WHERE n = trunc(n) AND n BETWEEN 1 AND 9223372036854775806
             ), 0) + 1)
             ON CONFLICT (collection, field)
             DO UPDATE SET value = GREATEST(sequences.value + 1, EXCLUDED.value)
             RETURNING value",
        )
        .bind(collection)
        .bind(field)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("advance sequence {collection}.{field}"))?;
        Ok(value)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

impl PostgresStore {
    async fn count_all(&self, collection: &str, query: &ListQuery) -> Result<i64> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM documents WHERE collection = ");
        builder.push_bind(collection.to_string());
        if let Some(status) = &query.status {
            builder.push(format!(" AND data->>'{}' = ", StatusSpec::FIELD));
            builder.push_bind(status.clone());
        }
        if let Some(search) = &query.search {
            push_search(&mut builder, search);
        }
        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Blob store
// =============================================================================

#[derive(sqlx::FromRow)]
struct BlobRow {
    id: String,
    content_type: String,
    size_bytes: i64,
    bytes: Vec<u8>,
}

pub struct PostgresBlobStore {
    pool: PgPool,
}

impl PostgresBlobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseBlobStore for PostgresBlobStore {
    async fn put(&self, content_type: &str, bytes: Bytes) -> Result<StoredBlob> {
        let id = content_address(&bytes);
        sqlx::query(
            "INSERT INTO blobs (id, content_type, size_bytes, bytes)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&id)
        .bind(content_type)
        .bind(bytes.len() as i64)
        .bind(bytes.as_ref())
        .execute(&self.pool)
        .await
        .context("store blob")?;

        // Same bytes may already exist under the first content type they were stored with.
        let (content_type, size_bytes): (String, i64) =
            sqlx::query_as("SELECT content_type, size_bytes FROM blobs WHERE id = $1")
                .bind(&id)
                .fetch_one(&self.pool)
                .await?;

        Ok(StoredBlob {
            id,
            content_type,
            size_bytes,
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Blob>> {
        let row = sqlx::query_as::<_, BlobRow>(
            "SELECT id, content_type, size_bytes, bytes FROM blobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Blob {
            meta: StoredBlob {
                id: row.id,
                content_type: row.content_type,
                size_bytes: row.size_bytes,
            },
            bytes: Bytes::from(row.bytes),
        }))
    }
}
