//! Write-time derived fields: slug, publish stamp and view counter seed.
//!
//! Sequence numbers need the store and are assigned in `actions::mutations`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::common::utils::slugify;
use crate::domains::resources::models::{ResourceType, StatusSpec};

/// Apply derived-field rules to validated fields.
///
/// `previous_status` is the stored status before this write, `None` on create.
pub fn apply(
    ty: &ResourceType,
    fields: &mut Map<String, Value>,
    previous_status: Option<&str>,
    now: DateTime<Utc>,
) {
    if let Some(rule) = ty.slug {
        let missing = fields
            .get(rule.field)
            .and_then(Value::as_str)
            .map(|s| s.trim().is_empty())
            .unwrap_or(true);
        if missing {
            let slug = fields
                .get(rule.source)
                .and_then(Value::as_str)
                .map(slugify)
                .filter(|s| !s.is_empty());
            if let Some(slug) = slug {
                fields.insert(rule.field.to_string(), Value::String(slug));
            }
        }
    }

    if let Some(rule) = ty.published_at {
        let status = fields.get(StatusSpec::FIELD).and_then(Value::as_str);
        let entering = status == Some(rule.status) && previous_status != Some(rule.status);
        if entering && !fields.contains_key(rule.field) {
            fields.insert(
                rule.field.to_string(),
                Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true)),
            );
        }
    }

    if let Some(counter) = ty.view_counter {
        fields.entry(counter).or_insert(Value::from(0));
    }
}
