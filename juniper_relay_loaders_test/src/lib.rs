//! Example app for `juniper_relay_loaders`: an in-memory store of editors and a small company,
//! served over axum. The integration tests in `tests/` run against this router.

pub mod config;
pub mod db;
pub mod schema;
pub mod server;
