//! Request bodies for tests, derived from the type descriptors.

use cms_core::domains::resources::models::{FieldKind, FieldSpec, ResourceType, PDF};
use serde_json::{json, Map, Value};

/// 1x1 transparent PNG.
pub const PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

pub fn png_data_uri() -> String {
    format!("data:image/png;base64,{PNG_BASE64}")
}

pub fn pdf_data_uri() -> String {
    "data:application/pdf;base64,JVBERi0xLjcKJeLjz9MK".to_string()
}

/// A valid value for `field`; `tag` keeps text values distinct.
pub fn sample_value(field: &FieldSpec, tag: &str) -> Value {
    match field.kind {
        FieldKind::ShortText | FieldKind::Reference => json!(format!("{} {}", field.name, tag)),
        FieldKind::LongText => json!(format!("Longer {} text for {}", field.name, tag)),
        FieldKind::RichText => json!(format!("<p>{} for {}</p>", field.name, tag)),
        FieldKind::Date => json!("2025-01-15"),
        FieldKind::Number => json!(7),
        FieldKind::Url => json!("https://example.org/page"),
        FieldKind::Binary if field.media == Some(PDF) => json!(pdf_data_uri()),
        FieldKind::Binary => json!(png_data_uri()),
    }
}

/// Body with every required field of `ty` filled in.
pub fn valid_body(ty: &ResourceType, tag: &str) -> Value {
    let fields: Map<String, Value> = ty
        .fields
        .iter()
        .filter(|f| f.required)
        .map(|f| (f.name.to_string(), sample_value(f, tag)))
        .collect();
    Value::Object(fields)
}

/// First required short-text field; every catalog type has one.
pub fn title_field(ty: &ResourceType) -> &'static str {
    ty.fields
        .iter()
        .find(|f| f.required && f.kind == FieldKind::ShortText)
        .map(|f| f.name)
        .expect("type has a required short text field")
}

pub fn tender_body(ref_no: &str) -> Value {
    json!({
        "refNo": ref_no,
        "dated": "2025-01-10",
        "details": "Supply and installation of laboratory equipment",
        "dateOfIssue": "2025-01-10",
        "startDate": "2025-01-11",
        "lastDate": "2025-02-10",
        "openingDate": "2025-02-12"
    })
}
