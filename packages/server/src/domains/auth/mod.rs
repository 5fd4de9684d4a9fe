//! Auth domain - editor tokens
//!
//! Reads are public. Writes require a signed token whose claims mark the
//! bearer as an admin; `cms_admin token` mints them.

pub mod jwt;

pub use jwt::{Claims, JwtService};
