// Institute CMS - API Core
//
// Generic CRUD engine over the institute's content types. Each type is a
// static descriptor in domains::catalog; one controller in
// domains::resources serves all of them over HTTP.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
