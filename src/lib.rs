// Library root — exposes the store and router for integration tests.
// The binary entry point is src/main.rs.

pub mod api;
pub mod config;
pub mod error;
pub mod logger;
pub mod store;
