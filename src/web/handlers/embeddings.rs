// POST /api/embeddings: lay out the salient terms of a text.
//
// Returns 200 with a JSON array of term layout records.
// Returns 400 for empty text or text that yields too few usable terms,
// 500 when the layout reducer fails.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{error, warn};

use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct EmbeddingsRequest {
    pub text: String,
}

pub async fn create_embeddings(
    State(state): State<AppState>,
    Json(body): Json<EmbeddingsRequest>,
) -> Response {
    let text = body.text.trim().to_string();
    if text.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "Input text cannot be empty.");
    }

    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.run(&text)).await;

    match result {
        Ok(Ok(layouts)) => (StatusCode::OK, Json(layouts)).into_response(),
        Ok(Err(e)) if e.is_client_error() => {
            warn!(error = ?e, "Rejected embeddings request");
            api_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Ok(Err(e)) => {
            error!(error = %e, "Pipeline failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
        Err(e) => {
            error!(error = %e, "Pipeline task panicked");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}
