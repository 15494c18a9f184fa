use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use docsight_models::{AnalyzeData, ResponseEnvelope};
use uuid::Uuid;

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze_document))
        .fallback(api_not_found)
}

async fn api_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ResponseEnvelope::<AnalyzeData>::failure(Uuid::new_v4(), "Not found")),
    )
        .into_response()
}
