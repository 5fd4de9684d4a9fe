//! `/api/<resource>` handlers. One set of handlers serves every catalog type.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use crate::common::{Actor, ApiError, Envelope};
use crate::domains::catalog;
use crate::domains::resources::{
    create_resource, delete_resource, get_resource, list_resources, update_resource, Document,
    ListFilters, ResourceType,
};
use crate::server::app::AxumAppState;

fn resource_type(name: &str) -> Result<&'static ResourceType, ApiError> {
    catalog::find(name).ok_or_else(|| ApiError::not_found(format!("Unknown resource type: {name}")))
}

/// Unwrap a JSON body, mapping extractor rejections onto the error taxonomy.
pub(crate) fn json_object(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Map<String, Value>, ApiError> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(_)) => Err(ApiError::validation("Request body must be a JSON object")),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(
            ApiError::PayloadTooLarge("Request body is too large".to_string()),
        ),
        Err(rejection) => Err(ApiError::validation(rejection.body_text())),
    }
}

pub async fn list_handler(
    Extension(state): Extension<AxumAppState>,
    Path(resource): Path<String>,
    Query(filters): Query<ListFilters>,
) -> Result<Json<Envelope<Vec<Document>>>, ApiError> {
    let ty = resource_type(&resource)?;
    let result = list_resources(ty, &filters, &state.deps).await?;
    Ok(Json(Envelope::list(result.items, result.total)))
}

pub async fn get_handler(
    Extension(state): Extension<AxumAppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Envelope<Document>>, ApiError> {
    let ty = resource_type(&resource)?;
    let doc = get_resource(ty, &id, &state.deps).await?;
    Ok(Json(Envelope::ok(doc)))
}

pub async fn create_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(actor): Extension<Actor>,
    Path(resource): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Document>>), ApiError> {
    let ty = resource_type(&resource)?;
    state.authorize_write(&actor)?;
    let body = json_object(body)?;

    let doc = create_resource(ty, body, &state.deps).await?;
    let message = format!("{} created", ty.label);
    Ok((StatusCode::CREATED, Json(Envelope::ok(doc).with_message(message))))
}

pub async fn update_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(actor): Extension<Actor>,
    Path((resource, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<Document>>, ApiError> {
    let ty = resource_type(&resource)?;
    state.authorize_write(&actor)?;
    let body = json_object(body)?;

    let doc = update_resource(ty, &id, body, &state.deps).await?;
    let message = format!("{} updated", ty.label);
    Ok(Json(Envelope::ok(doc).with_message(message)))
}

pub async fn delete_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(actor): Extension<Actor>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let ty = resource_type(&resource)?;
    state.authorize_write(&actor)?;

    delete_resource(ty, &id, &state.deps).await?;
    Ok(Json(Envelope::done(format!("{} deleted", ty.label))))
}
