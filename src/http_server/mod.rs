//! # HTTP Server Module
//!
//! Axum server exposing the company resource.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/companies` - List and create companies
//! - `/companies/:code` - Read, update and delete one company

pub mod company_routes;
pub mod config;
pub mod health_routes;
pub mod server;

pub use config::{ConfigError, ServerConfig, IN_MEMORY_DATABASE};
pub use server::HttpServer;
