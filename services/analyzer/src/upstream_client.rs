//! Generative-AI API Client
//!
//! Sends the document and instruction to a `generateContent` endpoint and
//! returns the model's raw text reply.

use docsight_models::{AnalysisRequest, GenerateContentResponse, UpstreamReply};
use docsight_utils::{
    truncate_for_log, AnalyzerError, AnalyzerResult, CredentialPlacement, UpstreamConfig,
    UpstreamFailure, UpstreamTarget,
};
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest slice of an upstream error body written to the logs.
const LOGGED_BODY_CHARS: usize = 512;

pub struct UpstreamClient {
    client: Client,
    max_request_bytes: usize,
    max_response_bytes: usize,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> AnalyzerResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AnalyzerError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_request_bytes: config.max_request_bytes,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// POST `request` to the target and pull the first candidate's text out
    /// of the reply.
    pub async fn generate(
        &self,
        target: &UpstreamTarget,
        request: &AnalysisRequest,
    ) -> AnalyzerResult<UpstreamReply> {
        let body = serde_json::to_vec(request)
            .map_err(|e| AnalyzerError::internal(format!("Failed to encode request: {}", e)))?;
        if body.len() > self.max_request_bytes {
            return Err(UpstreamFailure::RequestTooLarge {
                size: body.len(),
                limit: self.max_request_bytes,
            }
            .into());
        }
        debug!(bytes = body.len(), "Sending generateContent request");

        let builder = self
            .client
            .post(&target.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let builder = match target.credential_placement {
            CredentialPlacement::Query => {
                builder.query(&[(target.query_parameter.as_str(), target.api_key.as_str())])
            }
            CredentialPlacement::Bearer => builder.bearer_auth(&target.api_key),
        };

        let response = builder.send().await.map_err(UpstreamFailure::from)?;
        let status = response.status();
        let bytes = read_limited(response, self.max_response_bytes).await?;

        if !status.is_success() {
            let failure = UpstreamFailure::from_status(status.as_u16());
            warn!(
                status = status.as_u16(),
                kind = failure.label(),
                retryable = failure.is_retryable(),
                body = %truncate_for_log(&String::from_utf8_lossy(&bytes), LOGGED_BODY_CHARS),
                "Upstream returned an error"
            );
            return Err(failure.into());
        }

        parse_reply(&bytes)
    }
}

async fn read_limited(mut response: Response, limit: usize) -> Result<Vec<u8>, UpstreamFailure> {
    if response.content_length().is_some_and(|len| len as usize > limit) {
        return Err(UpstreamFailure::ResponseTooLarge { limit });
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if bytes.len() + chunk.len() > limit {
            return Err(UpstreamFailure::ResponseTooLarge { limit });
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

fn parse_reply(bytes: &[u8]) -> AnalyzerResult<UpstreamReply> {
    let raw: Value = serde_json::from_slice(bytes).map_err(|e| {
        warn!(
            body = %truncate_for_log(&String::from_utf8_lossy(bytes), LOGGED_BODY_CHARS),
            "Upstream reply is not JSON"
        );
        UpstreamFailure::InvalidResponse(format!("reply is not JSON: {}", e))
    })?;

    let envelope: GenerateContentResponse = serde_json::from_value(raw.clone())
        .map_err(|e| UpstreamFailure::InvalidResponse(format!("unexpected reply shape: {}", e)))?;

    let text = envelope.first_text().ok_or_else(|| {
        warn!(
            prompt_feedback = ?envelope.prompt_feedback,
            "Upstream reply has no text candidate"
        );
        UpstreamFailure::InvalidResponse("no text candidate in reply".to_string())
    })?;

    Ok(UpstreamReply {
        text,
        candidates: raw.get("candidates").cloned().unwrap_or(Value::Null),
        finish_reason: envelope
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone()),
    })
}
