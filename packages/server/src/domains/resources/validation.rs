//! Field validation and coercion driven by a `ResourceType` descriptor.
//!
//! Write flow: [`sanitize`] the request body, [`merge`] it over the stored
//! fields (or an empty map on create), then [`normalize`] the result. The
//! first violated constraint is reported as `ApiError::Validation`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Number, Value};
use url::Url;

use crate::common::ApiError;
use crate::domains::resources::models::{FieldKind, FieldSpec, MediaRule, ResourceType, StatusSpec};

lazy_static! {
    static ref DATA_URI: Regex =
        Regex::new(r"^data:([A-Za-z0-9.+-]+/[A-Za-z0-9.+-]+)((?:;[A-Za-z0-9_-]+=[A-Za-z0-9_.-]+)*);base64,(.*)$")
            .expect("data URI pattern compiles");
    static ref FILE_REF: Regex =
        Regex::new(r"^/api/files/[0-9a-f]{64}$").expect("file reference pattern compiles");
}

/// Keep only keys the client may write.
///
/// Empty strings on non-text fields (and on `status`) become `null`, which
/// [`merge`] treats as "remove".
pub fn sanitize(ty: &ResourceType, body: Map<String, Value>) -> Map<String, Value> {
    body.into_iter()
        .filter(|(key, _)| ty.accepts_key(key))
        .map(|(key, value)| {
            let textual = ty.field(&key).map(|f| f.kind.is_textual()).unwrap_or(false);
            let blank = matches!(&value, Value::String(s) if s.trim().is_empty());
            if blank && !textual {
                (key, Value::Null)
            } else {
                (key, value)
            }
        })
        .collect()
}

/// Overlay `patch` on `base`. Omitted keys stay untouched; `null` removes.
pub fn merge(mut base: Map<String, Value>, patch: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in patch {
        if value.is_null() {
            base.remove(&key);
        } else {
            base.insert(key, value);
        }
    }
    base
}

/// Validate the merged field set in declaration order, coercing values in place.
pub fn normalize(ty: &ResourceType, fields: &mut Map<String, Value>) -> Result<(), ApiError> {
    for spec in ty.fields {
        let Some(value) = fields.get(spec.name).filter(|v| !v.is_null()) else {
            if spec.required {
                return Err(required(spec.name));
            }
            continue;
        };

        if spec.required && is_blank(value) {
            return Err(required(spec.name));
        }

        let coerced = coerce(spec, value)?;
        if ty.sequence == Some(spec.name) {
            check_sequence(spec.name, &coerced)?;
        }
        fields.insert(spec.name.to_string(), coerced);
    }

    if let Some(status) = &ty.status {
        check_status(status, fields)?;
    }

    Ok(())
}

fn required(name: &str) -> ApiError {
    ApiError::validation(format!("{name} is required"))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn check_status(status: &StatusSpec, fields: &Map<String, Value>) -> Result<(), ApiError> {
    match fields.get(StatusSpec::FIELD) {
        None | Some(Value::Null) => Err(required(StatusSpec::FIELD)),
        Some(Value::String(value)) if status.allows(value) => Ok(()),
        Some(_) => Err(ApiError::validation(format!(
            "{} must be one of: {}",
            StatusSpec::FIELD,
            status.values.join(", ")
        ))),
    }
}

fn coerce(spec: &FieldSpec, value: &Value) -> Result<Value, ApiError> {
    match spec.kind {
        FieldKind::ShortText | FieldKind::LongText | FieldKind::RichText | FieldKind::Reference => {
            coerce_text(spec.name, value)
        }
        FieldKind::Number => coerce_number(spec.name, value),
        FieldKind::Date => check_date(spec.name, value),
        FieldKind::Url => check_url(spec.name, value),
        FieldKind::Binary => check_binary(spec, value),
    }
}

fn coerce_text(name: &str, value: &Value) -> Result<Value, ApiError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        _ => Err(ApiError::validation(format!("{name} must be text"))),
    }
}

fn coerce_number(name: &str, value: &Value) -> Result<Value, ApiError> {
    let invalid = || ApiError::validation(format!("{name} must be a number"));
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
            s.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

/// Sequence values stay below `i64::MAX` so the next number always fits.
fn check_sequence(name: &str, value: &Value) -> Result<(), ApiError> {
    match value.as_i64() {
        Some(n) if (1..i64::MAX).contains(&n) => Ok(()),
        _ => Err(ApiError::validation(format!(
            "{name} must be a positive whole number"
        ))),
    }
}

/// Accepts `YYYY-MM-DD` or RFC 3339; the stored value keeps the client's format.
fn check_date(name: &str, value: &Value) -> Result<Value, ApiError> {
    let valid = value.as_str().map(str::trim).filter(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(s).is_ok()
    });
    match valid {
        Some(s) => Ok(Value::String(s.to_string())),
        None => Err(ApiError::validation(format!("{name} must be a valid date"))),
    }
}

fn is_web_url(s: &str) -> bool {
    Url::parse(s)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

fn check_url(name: &str, value: &Value) -> Result<Value, ApiError> {
    match value.as_str().map(str::trim) {
        Some(s) if is_web_url(s) => Ok(Value::String(s.to_string())),
        _ => Err(ApiError::validation(format!("{name} must be a valid URL"))),
    }
}

fn check_binary(spec: &FieldSpec, value: &Value) -> Result<Value, ApiError> {
    let name = spec.name;
    let Some(s) = value.as_str().map(str::trim) else {
        return Err(ApiError::validation(format!(
            "{name} must be a data URI, URL or file reference"
        )));
    };

    if FILE_REF.is_match(s) || is_web_url(s) {
        return Ok(Value::String(s.to_string()));
    }

    let Some(captures) = DATA_URI.captures(s) else {
        return Err(ApiError::validation(format!(
            "{name} must be a data URI, URL or file reference"
        )));
    };

    let mime = captures[1].to_ascii_lowercase();
    if let Some(rule) = &spec.media {
        check_media(name, rule, &mime, &captures[3])?;
    }

    Ok(Value::String(s.to_string()))
}

fn check_media(name: &str, rule: &MediaRule, mime: &str, payload: &str) -> Result<(), ApiError> {
    if !rule.mime.contains(&mime) {
        return Err(ApiError::validation(format!(
            "{name} must be one of: {}",
            rule.mime.join(", ")
        )));
    }

    // Reject on encoded length before decoding anything large.
    if payload.len() / 4 * 3 > rule.max_bytes + 2 {
        return Err(too_large(name, rule));
    }
    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| ApiError::validation(format!("{name} is not valid base64")))?;
    if decoded.len() > rule.max_bytes {
        return Err(too_large(name, rule));
    }
    Ok(())
}

fn too_large(name: &str, rule: &MediaRule) -> ApiError {
    ApiError::validation(format!(
        "{name} exceeds the {} MB limit",
        rule.max_bytes / (1024 * 1024)
    ))
}
