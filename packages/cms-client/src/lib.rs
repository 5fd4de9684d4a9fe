//! Client for the Institute CMS REST API.
//!
//! Every call is described by an [`Operation`]; reads are cached under the
//! tags the operation provides and writes invalidate the tags they touch, so
//! a create/update/delete refreshes the affected list view.
//!
//! # Example
//!
//! ```rust,ignore
//! use cms_client::{CmsClient, ListParams};
//!
//! let client = CmsClient::new("http://localhost:8080").with_token(token);
//! let tenders: Vec<serde_json::Value> = client.list("tenders", &ListParams::all()).await?.items;
//! ```

pub mod cache;
pub mod error;
pub mod operation;
pub mod types;

pub use cache::TagCache;
pub use error::{ClientError, Result};
pub use operation::{Operation, OperationKind, Tag};
pub use types::{ListPage, ListParams};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use types::ApiEnvelope;

pub struct CmsClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    cache: TagCache,
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ClientError::Parse(e.to_string()))
}

impl CmsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            cache: TagCache::new(),
        }
    }

    /// Bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        op: &Operation,
        query: Option<&ListParams>,
        body: Option<&B>,
    ) -> Result<ApiEnvelope> {
        let url = format!("{}{}", self.base_url, op.path());
        let mut request = self.client.request(op.method(), &url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(method = %op.method(), url = %url, "CMS request");
        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        let envelope: Option<ApiEnvelope> = serde_json::from_str(&text).ok();
        match envelope {
            Some(envelope) if status.is_success() && envelope.success => Ok(envelope),
            Some(envelope) => Err(ClientError::Api {
                status: status.as_u16(),
                message: envelope.message.unwrap_or_else(|| status.to_string()),
            }),
            None if status.is_success() => Err(ClientError::Parse(format!(
                "expected a response envelope, got: {text}"
            ))),
            None => Err(ClientError::Api {
                status: status.as_u16(),
                message: text,
            }),
        }
    }

    async fn read(&self, op: Operation, query: Option<&ListParams>) -> Result<Value> {
        let key = match query {
            Some(params) => format!("{}?{}", op.path(), params.cache_suffix()),
            None => op.path(),
        };
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "CMS cache hit");
            return Ok(hit);
        }

        let envelope = self.send::<()>(&op, query, None).await?;
        let value = serde_json::json!({
            "data": envelope.data.unwrap_or(Value::Null),
            "total": envelope.total,
        });
        self.cache.insert(key, op.provides(), value.clone());
        Ok(value)
    }

    async fn write<B: Serialize + ?Sized>(
        &self,
        op: Operation,
        body: Option<&B>,
    ) -> Result<ApiEnvelope> {
        let envelope = self.send(&op, None, body).await?;
        let dropped = self.cache.invalidate(&op.invalidates());
        debug!(resource = %op.resource, dropped, "CMS cache invalidated");
        Ok(envelope)
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &ListParams,
    ) -> Result<ListPage<T>> {
        let mut value = self.read(Operation::list(resource), Some(params)).await?;
        let total = value["total"].as_i64();
        Ok(ListPage {
            items: decode(value["data"].take())?,
            total,
        })
    }

    /// Fetch one item. Cached reads do not reach the server's view counter.
    pub async fn get<T: DeserializeOwned>(&self, resource: &str, id: &str) -> Result<T> {
        let mut value = self.read(Operation::get(resource, id), None).await?;
        decode(value["data"].take())
    }

    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T> {
        let envelope = self.write(Operation::create(resource), Some(body)).await?;
        decode(envelope.data.unwrap_or(Value::Null))
    }

    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        id: &str,
        body: &B,
    ) -> Result<T> {
        let envelope = self.write(Operation::update(resource, id), Some(body)).await?;
        decode(envelope.data.unwrap_or(Value::Null))
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, resource: &str, id: &str) -> Result<String> {
        let envelope = self.write::<()>(Operation::delete(resource, id), None).await?;
        Ok(envelope.message.unwrap_or_default())
    }
}
