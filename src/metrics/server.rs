//! HTTP server for the scrape endpoint.

use crate::collector::CollectorRegistry;
use crate::config::ServerConfig;
use crate::metrics::render::CONTENT_TYPE;
use crate::metrics::Telemetry;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Errors that can occur during server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound.
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    /// The server stopped with an error.
    #[error("server error: {0}")]
    Server(String),
}

/// Shared state for the handlers.
struct AppState {
    registry: CollectorRegistry,
    telemetry: Telemetry,
}

/// HTTP server exposing resource metrics and exporter telemetry.
pub struct MetricsServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl MetricsServer {
    /// Creates a new metrics server.
    pub fn new(config: ServerConfig, registry: CollectorRegistry, telemetry: Telemetry) -> Self {
        Self {
            config,
            state: Arc::new(AppState {
                registry,
                telemetry,
            }),
        }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/telemetry", get(telemetry_handler))
            .route("/healthz", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Starts the HTTP server.
    ///
    /// Runs until Ctrl-C is received.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(
            addr = %self.config.bind_addr,
            kinds = ?self.state.registry.kinds(),
            "Metrics server listening"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down metrics server");
}

/// Handler for the /metrics endpoint.
///
/// Listing may block, so the pass runs on the blocking pool.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || state.registry.gather()).await;

    match result {
        Ok(Ok(output)) => (StatusCode::OK, [("content-type", CONTENT_TYPE)], output),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Scrape failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain; charset=utf-8")],
                format!("Failed to collect metrics: {}", e),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Collection task failed: {}", e),
        ),
    }
}

/// Handler for the /telemetry endpoint.
async fn telemetry_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.telemetry.encode() {
        Ok(output) => (StatusCode::OK, [("content-type", CONTENT_TYPE)], output),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode telemetry: {}", e),
        ),
    }
}

/// Handler for the /healthz endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::{CollectError, KindCollector};
    use crate::store::ListError;

    struct Down;

    impl KindCollector for Down {
        fn kind(&self) -> &'static str {
            "statefulset"
        }

        fn collect(&self) -> Result<String, CollectError> {
            Err(CollectError::List {
                kind: "statefulset",
                source: ListError::Unavailable("down".into()),
            })
        }
    }

    fn state(registry: CollectorRegistry) -> Arc<AppState> {
        Arc::new(AppState {
            registry,
            telemetry: Telemetry::new().unwrap(),
        })
    }

    #[tokio::test]
    async fn test_metrics_ok() {
        let response = metrics_handler(State(state(CollectorRegistry::new())))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_failure_is_server_error() {
        let mut registry = CollectorRegistry::new();
        registry.register(Box::new(Down)).unwrap();

        let response = metrics_handler(State(state(registry))).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_health() {
        let response = health_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
