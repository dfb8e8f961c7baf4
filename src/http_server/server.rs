//! # HTTP Server
//!
//! Combines the resource routers under `/api`, plus `/health` at the root.

use std::io;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::observability::Event;

use super::clients_routes::clients_routes;
use super::config::HttpServerConfig;
use super::contact_routes::contact_routes;
use super::health_routes::health_routes;
use super::projects_routes::projects_routes;
use super::state::AppState;
use super::users_routes::users_routes;

/// HTTP server
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = build_router(&config, state);
        Self { config, router }
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr = self.config.bind_addr()?;

        let listener = TcpListener::bind(addr).await?;
        info!(event = Event::Serving.as_str(), addr = %addr);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!(event = Event::ShutdownComplete.as_str());
        Ok(())
    }
}

async fn shutdown_signal() {
    // An error here means no signal handler; keep serving.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn cors_layer(config: &HttpServerConfig) -> CorsLayer {
    if config.allows_any_origin() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the combined router
pub fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(users_routes(state.clone()))
        .merge(clients_routes(state.clone()))
        .merge(projects_routes(state.clone()))
        .merge(contact_routes(state));

    Router::new()
        .merge(health_routes())
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MockEmailSender;
    use crate::query::PageLimits;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::in_memory(
            Arc::new(MockEmailSender::new()),
            PageLimits::default(),
        ))
    }

    #[tokio::test]
    async fn test_start_rejects_unparsable_host() {
        let config = HttpServerConfig {
            host: "not an address".to_string(),
            ..Default::default()
        };
        let err = HttpServer::new(config, state()).start().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_router_builds_with_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["https://app.example.com".to_string()],
            ..Default::default()
        };
        let _router = build_router(&config, state());
    }
}
