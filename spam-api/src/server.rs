//! API Server - HTTP server for the detection API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ApiConfig;
use crate::handlers::{self, AppState};
use crate::registry::ModelRegistry;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Create a new API server with untrained models
    pub fn new(config: &ApiConfig) -> Self {
        let registry = ModelRegistry::new(
            &config.training,
            Duration::from_secs(config.server.training_timeout_seconds),
        );

        Self {
            state: Arc::new(AppState { registry }),
            addr: config.listen_addr(),
        }
    }

    /// Shared state behind the router
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/ping", get(handlers::ping))
            .route("/models", get(handlers::models))
            .route("/detect", post(handlers::detect))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
