//! biztime - A small company registry served over HTTP
//!
//! CRUD over a single `companies` table, backed by SQLite and exposed
//! through an axum router.

pub mod cli;
pub mod company;
pub mod datastore;
pub mod http_server;
