//! Multipart upload extraction.

use axum::extract::multipart::{Field, Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use docsight_models::UploadedDocument;
use docsight_utils::{validate_mime_type, AnalyzerError, AnalyzerResult, UploadConfig};
use tracing::debug;

const DEFAULT_FILENAME: &str = "document.pdf";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Pull the single file field out of the request body.
///
/// The MIME type is checked before the field is buffered and the size cap is
/// enforced while streaming, so oversized or non-PDF uploads never sit in
/// memory in full.
pub async fn read_document(
    multipart: Result<Multipart, MultipartRejection>,
    config: &UploadConfig,
) -> AnalyzerResult<UploadedDocument> {
    let mut multipart = multipart.map_err(|rejection| {
        AnalyzerError::validation(
            "request",
            format!(
                "Expected a multipart/form-data upload: {}",
                rejection.body_text()
            ),
        )
    })?;

    let mut document: Option<UploadedDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        if field.name() != Some(config.field_name.as_str()) {
            debug!(field = ?field.name(), "Skipping unrelated multipart field");
            continue;
        }
        if document.is_some() {
            return Err(AnalyzerError::validation(
                &config.field_name,
                "Only one file may be uploaded per request",
            ));
        }

        let filename = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        validate_mime_type(&mime_type, &config.allowed_mime_type)?;

        let data = read_field(field, config).await?;
        document = Some(UploadedDocument::new(filename, mime_type, data));
    }

    document.ok_or_else(|| {
        AnalyzerError::validation(
            &config.field_name,
            format!("No file uploaded in the '{}' field", config.field_name),
        )
    })
}

async fn read_field(mut field: Field<'_>, config: &UploadConfig) -> AnalyzerResult<Vec<u8>> {
    let mut data = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, config))? {
        if data.len() + chunk.len() > config.max_file_size_bytes {
            return Err(too_large(config));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}

fn multipart_error(error: MultipartError, config: &UploadConfig) -> AnalyzerError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(config);
    }
    AnalyzerError::validation("request", format!("Malformed upload: {}", error.body_text()))
}

fn too_large(config: &UploadConfig) -> AnalyzerError {
    AnalyzerError::validation(
        "file_size",
        format!(
            "File size exceeds maximum allowed size {} bytes",
            config.max_file_size_bytes
        ),
    )
}
