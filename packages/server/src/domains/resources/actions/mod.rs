//! Generic resource controller: the five operations every resource type shares.

pub mod mutations;
pub mod queries;

pub use mutations::{create_resource, delete_resource, update_resource};
pub use queries::{get_resource, list_resources, ListFilters, ListResult, DEFAULT_LIMIT};
