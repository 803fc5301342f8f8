//! Vera daemon library - exposes modules for testing.

pub mod config;
pub mod fetcher;
pub mod routes;
pub mod server;
