// Common types and utilities shared across the application

pub mod actor;
pub mod envelope;
pub mod error;
pub mod id;
pub mod utils;

pub use actor::Actor;
pub use envelope::Envelope;
pub use error::ApiError;
pub use id::{ContentItem, DocumentId, Id};
