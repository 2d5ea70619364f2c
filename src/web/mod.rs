// Web server: Axum JSON API in front of the term layout pipeline.
//
// The word-vector table is loaded once before the server starts and shared
// read-only through AppState. Each request runs the pipeline on a blocking
// thread, so concurrent requests don't stall the async workers.

use std::sync::Arc;

use anyhow::Result;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::pipeline::Pipeline;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(pipeline: Pipeline, port: u16, bind: &str) -> Result<()> {
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    info!("Termscape API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// All routes with CORS and request tracing applied.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/embeddings",
            post(handlers::embeddings::create_embeddings),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check: always returns 200 OK.
async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Typed JSON error response helper.
pub fn api_error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(serde_json::json!({ "detail": message }))).into_response()
}
