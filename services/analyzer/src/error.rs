use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use docsight_models::{AnalyzeData, ResponseEnvelope};
use docsight_utils::AnalyzerError;
use tracing::{error, warn};
use uuid::Uuid;

/// An [`AnalyzerError`] bound to the session it failed in, rendered as the
/// failure envelope.
#[derive(Debug)]
pub struct ApiError {
    pub session_id: Uuid,
    pub error: AnalyzerError,
}

impl ApiError {
    pub fn new(session_id: Uuid, error: AnalyzerError) -> Self {
        Self { session_id, error }
    }

    /// Metric label for the request outcome.
    pub fn outcome(&self) -> String {
        self.error.error_code().to_ascii_lowercase()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(code = self.error.error_code(), error = %self.error, "Request failed");
        } else {
            warn!(code = self.error.error_code(), error = %self.error, "Request rejected");
        }

        let body = ResponseEnvelope::<AnalyzeData>::failure(self.session_id, self.error.user_message());
        (status, Json(body)).into_response()
    }
}
