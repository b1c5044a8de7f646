//! # HTTP Server
//!
//! Combines the company and health routers behind tracing and CORS layers.
//! The datastore is injected, so tests can run the same router against an
//! in-memory database.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::company::CompanyResource;
use crate::datastore::Datastore;

use super::company_routes::company_routes;
use super::config::ServerConfig;
use super::health_routes::health_routes;

/// Mount point of the company resource
pub const COMPANIES_PATH: &str = "/companies";

/// HTTP server for the company registry
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given datastore
    pub fn new(config: ServerConfig, store: Arc<dyn Datastore>) -> Self {
        let router = Self::build_router(&config, store);
        Self { config, router }
    }

    fn build_router(config: &ServerConfig, store: Arc<dyn Datastore>) -> Router {
        let resource = Arc::new(CompanyResource::new(store));

        Router::new()
            .merge(health_routes())
            .nest(COMPANIES_PATH, company_routes(resource))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors_layer(&config.cors_origins)),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until ctrl-c
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        let addr = listener.local_addr()?;

        tracing::info!(%addr, "biztime listening");
        tracing::info!("  GET|POST          {}", COMPANIES_PATH);
        tracing::info!("  GET|PUT|DELETE    {}/:code", COMPANIES_PATH);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("biztime stopped");
        Ok(())
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datastore::SqliteDatastore;

    fn store() -> Arc<dyn Datastore> {
        Arc::new(SqliteDatastore::open_in_memory().unwrap())
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(ServerConfig::with_port(8080), store());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_cors_origins() {
        let config = ServerConfig {
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "not a header\n".to_string(),
            ],
            ..Default::default()
        };
        let _router = HttpServer::new(config, store()).router();
    }
}
