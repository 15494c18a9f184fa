use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AnalysisResult;

/// Uniform JSON body returned by every `/api/*` endpoint that can fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub session_id: Uuid,
}

impl<T> ResponseEnvelope<T> {
    pub fn success(session_id: Uuid, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            session_id,
        }
    }

    pub fn failure(session_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            session_id,
        }
    }
}

/// Payload of a successful analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeData {
    pub session_id: Uuid,
    pub filename: String,
    pub size: usize,
    pub content_hash: String,
    pub summary: String,
    pub structured_data: AnalysisResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthStatus {
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_omits_data() {
        let id = Uuid::new_v4();
        let envelope: ResponseEnvelope<AnalyzeData> = ResponseEnvelope::failure(id, "No file was uploaded");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["message"], json!("No file was uploaded"));
        assert_eq!(value["sessionId"], json!(id.to_string()));
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_analyze_data_uses_camel_case() {
        let id = Uuid::new_v4();
        let data = AnalyzeData {
            session_id: id,
            filename: "report.pdf".to_string(),
            size: 42,
            content_hash: "abc".to_string(),
            summary: String::new(),
            structured_data: AnalysisResult::default(),
            logs: None,
        };
        let value = serde_json::to_value(ResponseEnvelope::success(id, "ok", data)).unwrap();

        assert_eq!(value["data"]["sessionId"], json!(id.to_string()));
        assert_eq!(value["data"]["contentHash"], json!("abc"));
        assert_eq!(value["data"]["structuredData"]["tables"], json!([]));
        assert!(value["data"].get("logs").is_none());
    }
}
