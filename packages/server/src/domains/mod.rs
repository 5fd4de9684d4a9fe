// Business domains
pub mod auth;
pub mod catalog;
pub mod files;
pub mod resources;
