//! Resource query actions
//!
//! Read operations shared by every resource type. Actions take the type
//! descriptor, handle ID parsing and return final documents.

use serde::Deserialize;
use tracing::{debug, info};

use crate::common::{ApiError, DocumentId};
use crate::domains::resources::models::{Document, FieldKind, ResourceType, SortOrder};
use crate::kernel::{ListQuery, ServerDeps, SortKey, TextSearch};

/// Default and ceiling-free page size for list requests.
pub const DEFAULT_LIMIT: i64 = 100;

/// Query-string filters of `GET /api/<resource>`.
///
/// Kept as raw strings so a malformed `limit` surfaces as a validation
/// message instead of an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilters {
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Document>,
    /// Present for types that report the unlimited match count.
    pub total: Option<i64>,
}

impl ListFilters {
    fn limit(&self) -> Result<i64, ApiError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(DEFAULT_LIMIT),
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ApiError::validation("limit must be a positive integer")),
        }
    }

    /// `None` means no filtering; "all" disables the type's default filter.
    fn status(&self, ty: &ResourceType) -> Option<String> {
        match self.status.as_deref().map(str::trim) {
            Some("all") => None,
            Some(value) if !value.is_empty() => Some(value.to_string()),
            _ => ty
                .status
                .and_then(|s| s.default_filter)
                .map(str::to_string),
        }
    }

    fn search(&self, ty: &ResourceType) -> Option<TextSearch> {
        let term = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some(TextSearch {
            term: term.to_string(),
            fields: ty.search.to_vec(),
        })
    }
}

pub(crate) fn sort_key(ty: &ResourceType) -> SortKey {
    let field = |name: &'static str, descending: bool| SortKey::Field {
        name,
        numeric: ty.field(name).map(|f| f.kind == FieldKind::Number).unwrap_or(false),
        descending,
    };
    match ty.sort {
        SortOrder::NewestFirst => SortKey::NewestFirst,
        SortOrder::Ascending(name) => field(name, false),
        SortOrder::Descending(name) => field(name, true),
    }
}

/// Malformed identifiers cannot name a stored item, so they read as missing.
pub(crate) fn parse_id(ty: &ResourceType, raw: &str) -> Result<DocumentId, ApiError> {
    DocumentId::parse(raw).map_err(|_| not_found(ty))
}

pub(crate) fn not_found(ty: &ResourceType) -> ApiError {
    ApiError::not_found(format!("{} not found", ty.label))
}

/// List items in the type's default order, truncated to `limit`.
pub async fn list_resources(
    ty: &ResourceType,
    filters: &ListFilters,
    deps: &ServerDeps,
) -> Result<ListResult, ApiError> {
    let query = ListQuery {
        status: filters.status(ty),
        search: filters.search(ty),
        sort: sort_key(ty),
        limit: filters.limit()?,
    };

    debug!(resource = ty.name, ?query, "Listing resources");

    let page = deps.store.list(ty.name, &query).await?;

    Ok(ListResult {
        items: page.items,
        total: ty.reports_total.then_some(page.total),
    })
}

/// Get a single item. Types with a view counter record the read first.
pub async fn get_resource(
    ty: &ResourceType,
    raw_id: &str,
    deps: &ServerDeps,
) -> Result<Document, ApiError> {
    let id = parse_id(ty, raw_id)?;

    let found = match ty.view_counter {
        Some(counter) => {
            info!(resource = ty.name, id = %id, "Recording view");
            deps.store.increment(ty.name, id, counter).await?
        }
        None => deps.store.find(ty.name, id).await?,
    };

    found.ok_or_else(|| not_found(ty))
}
