use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use validator::Validate;

use crate::error::{AnalyzerError, AnalyzerResult};

/// Environment variable consulted when `upstream.api_key` is not configured.
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate]
    pub server: ServerConfig,
    #[validate]
    pub upload: UploadConfig,
    #[validate]
    pub upstream: UpstreamConfig,
    #[validate]
    pub generation: GenerationConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    pub static_dir: String,
    /// Allowance on top of the file ceiling for multipart framing.
    pub multipart_overhead_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UploadConfig {
    #[validate(length(min = 1))]
    pub field_name: String,
    #[validate(range(min = 1))]
    pub max_file_size_bytes: usize,
    #[validate(length(min = 1))]
    pub allowed_mime_type: String,
    pub require_pdf_signature: bool,
}

/// How the credential travels to the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialPlacement {
    /// `?key=<credential>` on the endpoint URL.
    Query,
    /// `Authorization: Bearer <credential>`.
    Bearer,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpstreamConfig {
    #[validate(url)]
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub credential_placement: CredentialPlacement,
    pub query_parameter: String,
    #[validate(range(min = 1, max = 600))]
    pub timeout_seconds: u64,
    #[validate(range(min = 1))]
    pub max_request_bytes: usize,
    #[validate(range(min = 1))]
    pub max_response_bytes: usize,
}

/// Endpoint and credential that passed the presence check.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    pub endpoint: String,
    pub api_key: String,
    pub credential_placement: CredentialPlacement,
    pub query_parameter: String,
}

impl UpstreamConfig {
    /// Resolve the endpoint and credential, failing before any network use
    /// when either is missing or blank.
    pub fn target(&self) -> AnalyzerResult<UpstreamTarget> {
        let endpoint = non_blank(self.endpoint.as_deref())
            .ok_or_else(|| AnalyzerError::configuration("Upstream endpoint is not configured"))?;
        let api_key = non_blank(self.api_key.as_deref())
            .ok_or_else(|| AnalyzerError::configuration("Upstream API key is not configured"))?;

        Ok(UpstreamTarget {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            credential_placement: self.credential_placement,
            query_parameter: self.query_parameter.clone(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GenerationConfig {
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub top_k: u32,
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: f32,
    #[validate(range(min = 1, max = 8192))]
    pub max_output_tokens: u32,
    pub response_mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Return pipeline stage notes in `data.logs`.
    pub include_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub metrics_enabled: bool,
    pub prometheus_namespace: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("DOCSIGHT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut loaded: Self = config.build()?.try_deserialize()?;
        if non_blank(loaded.upstream.api_key.as_deref()).is_none() {
            loaded.upstream.api_key = env::var(FALLBACK_API_KEY_VAR).ok();
        }

        Ok(loaded)
    }

    /// Body limit for the upload route: file ceiling plus multipart framing.
    pub fn request_body_limit(&self) -> usize {
        self.upload
            .max_file_size_bytes
            .saturating_add(self.server.multipart_overhead_bytes)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upload: UploadConfig::default(),
            upstream: UpstreamConfig::default(),
            generation: GenerationConfig::default(),
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
            monitoring: MonitoringConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
            multipart_overhead_bytes: 64 * 1024,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            field_name: "pdf".to_string(),
            max_file_size_bytes: 10 * 1024 * 1024, // 10MB
            allowed_mime_type: "application/pdf".to_string(),
            require_pdf_signature: true,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            credential_placement: CredentialPlacement::Query,
            query_parameter: "key".to_string(),
            timeout_seconds: 60,
            max_request_bytes: 20 * 1024 * 1024,
            max_response_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_k: 1,
            top_p: 0.95,
            max_output_tokens: 2048,
            response_mime_type: Some("application/json".to_string()),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { include_logs: false }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            file_path: None,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            prometheus_namespace: "docsight".to_string(),
        }
    }
}
