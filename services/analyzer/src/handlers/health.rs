use axum::response::Json;
use docsight_models::HealthStatus;

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus::healthy(env!("CARGO_PKG_VERSION")))
}
