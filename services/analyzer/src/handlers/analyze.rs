use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use docsight_models::ResponseEnvelope;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::{error::ApiError, upload::read_document, AppState};

pub const SUCCESS_MESSAGE: &str = "File successfully analyzed";

/// `POST /api/analyze`
pub async fn analyze_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let session_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze", session_id = %session_id);

    async move {
        let result = async {
            let document = read_document(multipart, &state.config.upload).await?;
            info!(
                filename = %document.filename,
                size = document.size,
                "Received upload"
            );
            state.pipeline.run(session_id, document).await
        }
        .await;

        match result {
            Ok(data) => {
                state.metrics.record_request("success");
                (
                    StatusCode::OK,
                    Json(ResponseEnvelope::success(session_id, SUCCESS_MESSAGE, data)),
                )
                    .into_response()
            }
            Err(error) => {
                let error = ApiError::new(session_id, error);
                state.metrics.record_request(&error.outcome());
                error.into_response()
            }
        }
    }
    .instrument(span)
    .await
}
