use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire envelope: `{success, data?, count?, total?, message?}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Query parameters of a list call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListParams {
    /// Every item regardless of status.
    pub fn all() -> Self {
        Self {
            status: Some("all".to_string()),
            ..Self::default()
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn cache_suffix(&self) -> String {
        format!(
            "status={}&search={}&limit={}",
            self.status.as_deref().unwrap_or(""),
            self.search.as_deref().unwrap_or(""),
            self.limit.map(|l| l.to_string()).unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Unlimited match count, for types that report it.
    pub total: Option<i64>,
}
