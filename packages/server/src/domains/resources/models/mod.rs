//! Resource domain models

pub mod document;
pub mod resource_type;

pub use document::Document;
pub use resource_type::{
    DependentGuard, FieldKind, FieldSpec, MediaRule, ParentKey, PublishRule, ResourceType,
    SlugRule, SortOrder, StatusSpec, IMAGE, PDF,
};
