//! Resource type descriptors.
//!
//! A `ResourceType` is plain static data: collection name, field schema,
//! status enum, default sort, searchable fields, derived-field rules and
//! protected dependents. The generic controller in `actions` reads nothing
//! else, so adding a content type means adding one declaration in
//! `domains::catalog`.

use serde::Serialize;

/// Semantic type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    ShortText,
    LongText,
    RichText,
    Date,
    Number,
    Url,
    /// Image/PDF payload: a data URI, an external link, or a stored file reference.
    Binary,
    /// Key borrowed from another resource type.
    Reference,
}

impl FieldKind {
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            FieldKind::ShortText | FieldKind::LongText | FieldKind::RichText | FieldKind::Reference
        )
    }
}

/// Accepted MIME types and size cap for a binary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRule {
    pub mime: &'static [&'static str],
    pub max_bytes: usize,
}

pub const IMAGE: MediaRule = MediaRule {
    mime: &["image/png", "image/jpeg", "image/webp", "image/gif", "image/svg+xml"],
    max_bytes: 5 * 1024 * 1024,
};

pub const PDF: MediaRule = MediaRule {
    mime: &["application/pdf"],
    max_bytes: 10 * 1024 * 1024,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaRule>,
    /// Resource type this field points into, for `Reference` fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<&'static str>,
}

impl FieldSpec {
    const fn of(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            media: None,
            references: None,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self::of(name, FieldKind::ShortText)
    }

    pub const fn long_text(name: &'static str) -> Self {
        Self::of(name, FieldKind::LongText)
    }

    pub const fn rich_text(name: &'static str) -> Self {
        Self::of(name, FieldKind::RichText)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::of(name, FieldKind::Date)
    }

    pub const fn number(name: &'static str) -> Self {
        Self::of(name, FieldKind::Number)
    }

    pub const fn url(name: &'static str) -> Self {
        Self::of(name, FieldKind::Url)
    }

    pub const fn image(name: &'static str) -> Self {
        Self {
            media: Some(IMAGE),
            ..Self::of(name, FieldKind::Binary)
        }
    }

    pub const fn pdf(name: &'static str) -> Self {
        Self {
            media: Some(PDF),
            ..Self::of(name, FieldKind::Binary)
        }
    }

    pub const fn reference(name: &'static str, target: &'static str) -> Self {
        Self {
            references: Some(target),
            ..Self::of(name, FieldKind::Reference)
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }
}

/// The `status` field: allowed values, initial value and list defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSpec {
    pub values: &'static [&'static str],
    pub initial: &'static str,
    /// Filter applied when a list request carries no `status` parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_filter: Option<&'static str>,
}

impl StatusSpec {
    pub const FIELD: &'static str = "status";

    pub const fn new(values: &'static [&'static str], initial: &'static str) -> Self {
        Self {
            values,
            initial,
            default_filter: None,
        }
    }

    pub const fn listing_only(self, value: &'static str) -> Self {
        Self {
            default_filter: Some(value),
            ..self
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        self.values.contains(&value)
    }
}

/// Deterministic list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "by", content = "field", rename_all = "snake_case")]
pub enum SortOrder {
    /// Reverse-chronological by creation time.
    NewestFirst,
    Ascending(&'static str),
    Descending(&'static str),
}

/// Fill `field` with a slug of `source` when the client leaves it empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlugRule {
    pub field: &'static str,
    pub source: &'static str,
}

/// Stamp `field` with the current time the first time status becomes `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PublishRule {
    pub field: &'static str,
    pub status: &'static str,
}

/// Which parent value dependents store in their reference field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "by", content = "field", rename_all = "snake_case")]
pub enum ParentKey {
    Id,
    Field(&'static str),
}

/// Parent delete is refused while any `child` item has `field == key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentGuard {
    pub child: &'static str,
    pub field: &'static str,
    pub key: ParentKey,
    /// Plural noun for the dependents, used in conflict messages.
    pub noun: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    /// Collection name and URL segment (`/api/<name>`).
    pub name: &'static str,
    /// Singular human-readable name.
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub status: Option<StatusSpec>,
    pub sort: SortOrder,
    pub search: &'static [&'static str],
    pub slug: Option<SlugRule>,
    pub published_at: Option<PublishRule>,
    /// Number field filled from the store's atomic counter when absent.
    pub sequence: Option<&'static str>,
    /// Counter bumped by single-item reads.
    pub view_counter: Option<&'static str>,
    pub dependents: &'static [DependentGuard],
    /// Whether list responses carry the unlimited match count.
    pub reports_total: bool,
}

/// Keys the server owns on every resource type.
const SYSTEM_KEYS: &[&str] = &["id", "_id", "__v", "createdAt", "updatedAt"];

impl ResourceType {
    pub const fn new(name: &'static str, label: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            name,
            label,
            fields,
            status: None,
            sort: SortOrder::NewestFirst,
            search: &[],
            slug: None,
            published_at: None,
            sequence: None,
            view_counter: None,
            dependents: &[],
            reports_total: false,
        }
    }

    pub const fn with_status(self, status: StatusSpec) -> Self {
        Self {
            status: Some(status),
            ..self
        }
    }

    pub const fn sorted(self, sort: SortOrder) -> Self {
        Self { sort, ..self }
    }

    pub const fn searchable(self, search: &'static [&'static str]) -> Self {
        Self { search, ..self }
    }

    pub const fn slug_from(self, source: &'static str) -> Self {
        Self {
            slug: Some(SlugRule {
                field: "slug",
                source,
            }),
            ..self
        }
    }

    pub const fn published_when(self, status: &'static str) -> Self {
        Self {
            published_at: Some(PublishRule {
                field: "publishedAt",
                status,
            }),
            ..self
        }
    }

    pub const fn numbered_by(self, field: &'static str) -> Self {
        Self {
            sequence: Some(field),
            ..self
        }
    }

    pub const fn counts_views(self) -> Self {
        Self {
            view_counter: Some("views"),
            ..self
        }
    }

    pub const fn protected_by(self, dependents: &'static [DependentGuard]) -> Self {
        Self { dependents, ..self }
    }

    pub const fn with_total(self) -> Self {
        Self {
            reports_total: true,
            ..self
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Keys clients may not write: identity, timestamps and derived counters.
    pub fn is_system_key(&self, key: &str) -> bool {
        SYSTEM_KEYS.contains(&key)
            || self.view_counter == Some(key)
            || self.published_at.map(|rule| rule.field) == Some(key)
    }

    /// Keys clients may write.
    pub fn accepts_key(&self, key: &str) -> bool {
        if self.is_system_key(key) {
            return false;
        }
        self.field(key).is_some() || (self.status.is_some() && key == StatusSpec::FIELD)
    }
}
