//! Resources domain - the generic CRUD engine
//!
//! Every content type is a static `ResourceType` descriptor (see
//! `domains::catalog`). The actions here read only the descriptor, so all
//! types share one implementation of list/get/create/update/delete.

pub mod actions;
pub mod derive;
pub mod models;
pub mod validation;

pub use actions::{
    create_resource, delete_resource, get_resource, list_resources, update_resource, ListFilters,
    ListResult,
};
pub use models::{Document, ResourceType};
