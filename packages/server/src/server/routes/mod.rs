// HTTP routes
pub mod files;
pub mod health;
pub mod resources;
pub mod schema;

pub use files::*;
pub use health::*;
pub use resources::*;
pub use schema::*;
