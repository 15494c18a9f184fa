use thiserror::Error;

/// Ways the call to the generative-AI API can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    #[error("upstream unavailable (HTTP {status})")]
    Unavailable { status: u16 },

    #[error("upstream rejected the request (HTTP {status})")]
    Rejected { status: u16 },

    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream transport error: {0}")]
    Transport(String),

    #[error("upstream request body of {size} bytes exceeds the {limit} byte limit")]
    RequestTooLarge { size: usize, limit: usize },

    #[error("upstream response exceeds the {limit} byte limit")]
    ResponseTooLarge { limit: usize },

    #[error("upstream response was not usable: {0}")]
    InvalidResponse(String),
}

impl UpstreamFailure {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        if status >= 500 {
            Self::Unavailable { status }
        } else {
            Self::Rejected { status }
        }
    }

    /// Whether a later attempt could succeed. 4xx replies mean the request
    /// itself is wrong and must not be repeated as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Timeout | Self::Transport(_)
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::Rejected { .. } => "rejected",
            Self::Timeout => "timeout",
            Self::Transport(_) => "transport",
            Self::RequestTooLarge { .. } => "request_too_large",
            Self::ResponseTooLarge { .. } => "response_too_large",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl From<reqwest::Error> for UpstreamFailure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            // The URL may carry the credential as a query parameter.
            Self::Transport(error.without_url().to_string())
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum AnalyzerError {
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamFailure),

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AnalyzerError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Configuration { .. } => 500,
            Self::Upstream(_) => 502,
            Self::Internal { .. } => 500,
        }
    }

    /// Text safe to show to the caller. Upstream detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Configuration { message } => format!("Server configuration error: {}", message),
            Self::Upstream(failure) => match failure {
                UpstreamFailure::Rejected { .. } | UpstreamFailure::RequestTooLarge { .. } => {
                    "The analysis service could not process this document".to_string()
                }
                UpstreamFailure::InvalidResponse(_) | UpstreamFailure::ResponseTooLarge { .. } => {
                    "The analysis service returned an unusable response".to_string()
                }
                _ => "The analysis service is temporarily unavailable, please try again later"
                    .to_string(),
            },
            Self::Internal { .. } => "Internal server error".to_string(),
        }
    }
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
