//! Axum server setup and router configuration.

use crate::api;
use crate::config::runtime::AllowedOrigins;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{
    Json, Router,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use hookfeed_core::store::EventStore;
use hookfeed_sdk::objects::{ErrorResponse, HealthResponse, IndexResponse};
use std::any::Any;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the main application router.
pub fn build_router<S: EventStore>(state: AppState<S>, origins: &AllowedOrigins) -> Router {
    Router::new()
        .route("/", get(index))
        // Health check endpoint
        .route("/api/health", get(health_check))
        .merge(api::router::<S>())
        // Add state to all routes
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors_layer(origins))
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer for the configured origins.
pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(cors::Any);
    match origins {
        AllowedOrigins::Any => layer.allow_origin(cors::Any),
        AllowedOrigins::List(list) => layer.allow_origin(AllowOrigin::list(list.iter().cloned())),
    }
}

async fn index() -> impl IntoResponse {
    Json(IndexResponse {
        message: "Webhook server is running".to_string(),
    })
}

/// Simple health check - returns OK if the server is running.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: time::OffsetDateTime::now_utc(),
    })
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "Handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error")),
    )
        .into_response()
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
