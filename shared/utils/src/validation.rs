use docsight_models::UploadedDocument;
use validator::{Validate, ValidationErrors};

use crate::config::UploadConfig;
use crate::error::{AnalyzerError, AnalyzerResult};

const PDF_MAGIC: &[u8] = b"%PDF";

pub fn validate_model<T: Validate>(model: &T) -> AnalyzerResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(AnalyzerError::configuration(format_validation_errors(&errors))),
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, "", &mut messages);
    messages.sort();
    messages.join(", ")
}

fn collect_messages(errors: &ValidationErrors, prefix: &str, messages: &mut Vec<String>) {
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            messages.push(format!("Invalid value for '{}{}': {}", prefix, field, error.code));
        }
    }
    for (field, kind) in errors.errors() {
        if let validator::ValidationErrorsKind::Struct(nested) = kind {
            collect_messages(nested, &format!("{}{}.", prefix, field), messages);
        }
    }
}

pub fn validate_file_size(file_size: usize, max_size: usize) -> AnalyzerResult<()> {
    if file_size > max_size {
        return Err(AnalyzerError::validation(
            "file_size",
            format!(
                "File size {} bytes exceeds maximum allowed size {} bytes",
                file_size, max_size
            ),
        ));
    }

    Ok(())
}

/// The MIME essence (parameters stripped) must equal `allowed`.
pub fn validate_mime_type(mime_type: &str, allowed: &str) -> AnalyzerResult<()> {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    if !essence.eq_ignore_ascii_case(allowed) {
        return Err(AnalyzerError::validation("mime_type", "Only PDF files are allowed"));
    }

    Ok(())
}

pub fn validate_pdf_signature(data: &[u8]) -> AnalyzerResult<()> {
    if !data.starts_with(PDF_MAGIC) {
        return Err(AnalyzerError::validation(
            "pdf",
            "File content is not a valid PDF document",
        ));
    }

    Ok(())
}

/// Checks applied to every upload before anything leaves the process.
pub fn validate_upload(document: &UploadedDocument, config: &UploadConfig) -> AnalyzerResult<()> {
    validate_mime_type(&document.mime_type, &config.allowed_mime_type)?;
    validate_file_size(document.size, config.max_file_size_bytes)?;
    if document.size == 0 {
        return Err(AnalyzerError::validation("pdf", "Uploaded file is empty"));
    }
    if config.require_pdf_signature {
        validate_pdf_signature(document.magic())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn pdf(data: &[u8]) -> UploadedDocument {
        UploadedDocument::new("doc.pdf", "application/pdf", data.to_vec())
    }

    #[test]
    fn test_validate_mime_type() {
        assert!(validate_mime_type("application/pdf", "application/pdf").is_ok());
        assert!(validate_mime_type("Application/PDF; name=x", "application/pdf").is_ok());
        assert!(validate_mime_type("image/png", "application/pdf").is_err());
        assert!(validate_mime_type("application/pdfx", "application/pdf").is_err());
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(10, 10).is_ok());
        let err = validate_file_size(11, 10).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_validate_upload() {
        let config = AppConfig::default().upload;
        assert!(validate_upload(&pdf(b"%PDF-1.4 body"), &config).is_ok());
        assert!(validate_upload(&pdf(b""), &config).is_err());
        assert!(validate_upload(&pdf(b"GIF89a"), &config).is_err());

        let mut lenient = config.clone();
        lenient.require_pdf_signature = false;
        assert!(validate_upload(&pdf(b"GIF89a"), &lenient).is_ok());

        let png = UploadedDocument::new("x.png", "image/png", b"%PDF".to_vec());
        assert!(validate_upload(&png, &config).is_err());
    }

    #[test]
    fn test_oversized_upload_rejected() {
        let mut config = AppConfig::default().upload;
        config.max_file_size_bytes = 8;
        let err = validate_upload(&pdf(b"%PDF-1.4 too long"), &config).unwrap_err();
        match err {
            AnalyzerError::Validation { field, .. } => assert_eq!(field, "file_size"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_model_reports_nested_fields() {
        let mut config = AppConfig::default();
        config.upload.max_file_size_bytes = 0;
        let err = validate_model(&config).unwrap_err();
        assert!(err.to_string().contains("upload.max_file_size_bytes"));
    }
}
