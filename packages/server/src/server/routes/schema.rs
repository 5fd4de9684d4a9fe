//! Published descriptors, so clients validate with the server's rules.

use axum::{extract::Path, Json};

use crate::common::{ApiError, Envelope};
use crate::domains::catalog;
use crate::domains::resources::ResourceType;

pub async fn schema_index_handler() -> Json<Envelope<Vec<&'static ResourceType>>> {
    Json(Envelope::list(catalog::all().to_vec(), None))
}

pub async fn schema_handler(
    Path(resource): Path<String>,
) -> Result<Json<Envelope<&'static ResourceType>>, ApiError> {
    catalog::find(&resource)
        .map(|ty| Json(Envelope::ok(ty)))
        .ok_or_else(|| ApiError::not_found(format!("Unknown resource type: {resource}")))
}
