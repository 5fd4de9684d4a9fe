//! Resource mutation actions
//!
//! Create, update and delete for every resource type. Validation and
//! derived fields run here; the store only persists what it is handed.

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::queries::{not_found, parse_id};
use crate::common::ApiError;
use crate::domains::resources::models::{Document, ParentKey, ResourceType, StatusSpec};
use crate::domains::resources::{derive, validation};
use crate::kernel::{DeleteOutcome, ReferenceCheck, ServerDeps};

/// Store precision is microseconds; truncate so responses match reads.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

async fn assign_sequence(
    ty: &ResourceType,
    fields: &mut Map<String, Value>,
    deps: &ServerDeps,
) -> Result<(), ApiError> {
    if let Some(field) = ty.sequence {
        if !fields.contains_key(field) {
            let next = deps.store.next_sequence(ty.name, field).await?;
            fields.insert(field.to_string(), Value::from(next));
        }
    }
    Ok(())
}

/// Validate, derive and persist a new item.
pub async fn create_resource(
    ty: &ResourceType,
    body: Map<String, Value>,
    deps: &ServerDeps,
) -> Result<Document, ApiError> {
    let mut fields = validation::merge(Map::new(), validation::sanitize(ty, body));
    if let Some(status) = &ty.status {
        fields
            .entry(StatusSpec::FIELD)
            .or_insert_with(|| Value::from(status.initial));
    }
    validation::normalize(ty, &mut fields)?;

    let now = now();
    derive::apply(ty, &mut fields, None, now);
    assign_sequence(ty, &mut fields, deps).await?;

    let created = deps.store.insert(ty.name, &Document::new(fields, now)).await?;

    info!(resource = ty.name, id = %created.id, "Created resource");

    Ok(created)
}

/// Merge supplied fields over the stored item and re-validate the result.
pub async fn update_resource(
    ty: &ResourceType,
    raw_id: &str,
    body: Map<String, Value>,
    deps: &ServerDeps,
) -> Result<Document, ApiError> {
    let id = parse_id(ty, raw_id)?;
    let existing = deps
        .store
        .find(ty.name, id)
        .await?
        .ok_or_else(|| not_found(ty))?;

    let previous_status = existing.str_field(StatusSpec::FIELD).map(str::to_string);
    let mut fields = validation::merge(existing.fields.clone(), validation::sanitize(ty, body));
    validation::normalize(ty, &mut fields)?;

    let mut now = now();
    if now <= existing.updated_at {
        now = existing.updated_at + TimeDelta::microseconds(1);
    }
    derive::apply(ty, &mut fields, previous_status.as_deref(), now);
    assign_sequence(ty, &mut fields, deps).await?;

    let doc = Document {
        id,
        fields,
        created_at: existing.created_at,
        updated_at: now,
    };
    let updated = deps
        .store
        .replace(ty.name, &doc, ty.view_counter.as_slice())
        .await?
        .ok_or_else(|| not_found(ty))?;

    info!(resource = ty.name, id = %id, "Updated resource");

    Ok(updated)
}

fn conflict(ty: &ResourceType, count: i64, noun: &str) -> ApiError {
    ApiError::Conflict(format!(
        "Cannot delete this {}: {} {} still reference it",
        ty.label.to_lowercase(),
        count,
        noun
    ))
}

/// Hard delete, refused while protected dependents still point at the item.
pub async fn delete_resource(
    ty: &ResourceType,
    raw_id: &str,
    deps: &ServerDeps,
) -> Result<(), ApiError> {
    let id = parse_id(ty, raw_id)?;
    let existing = deps
        .store
        .find(ty.name, id)
        .await?
        .ok_or_else(|| not_found(ty))?;

    let mut checks = Vec::with_capacity(ty.dependents.len());
    for guard in ty.dependents {
        let value = match guard.key {
            ParentKey::Id => Some(id.to_string()),
            ParentKey::Field(field) => existing.text_of(field),
        };
        let Some(value) = value else { continue };

        let count = deps
            .store
            .count_matching(guard.child, guard.field, &value)
            .await?;
        if count > 0 {
            warn!(resource = ty.name, id = %id, dependents = guard.child, count, "Delete blocked");
            return Err(conflict(ty, count, guard.noun));
        }
        checks.push(ReferenceCheck {
            collection: guard.child,
            field: guard.field,
            value,
        });
    }

    // The pre-check gives a precise message; the store re-checks atomically.
    match deps.store.delete_unreferenced(ty.name, id, &checks).await? {
        DeleteOutcome::Deleted => {
            info!(resource = ty.name, id = %id, "Deleted resource");
            Ok(())
        }
        DeleteOutcome::NotFound => Err(not_found(ty)),
        DeleteOutcome::Referenced(count) => {
            let noun = ty.dependents.first().map(|g| g.noun).unwrap_or("items");
            Err(conflict(ty, count, noun))
        }
    }
}
