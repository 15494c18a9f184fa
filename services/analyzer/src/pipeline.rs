//! Analysis pipeline: validate, build, call, parse.
//!
//! Every check that can fail without the network runs before the upstream
//! call, so a bad upload or a missing credential never costs a request.

use docsight_models::{AnalyzeData, UploadedDocument};
use docsight_utils::{validate_upload, AnalyzerResult, AppConfig, ResponseParser};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::metrics::Metrics;
use crate::prompt::PromptBuilder;
use crate::upstream_client::UpstreamClient;

pub struct AnalysisPipeline {
    config: Arc<AppConfig>,
    prompt: PromptBuilder,
    client: UpstreamClient,
    parser: ResponseParser,
    metrics: Arc<Metrics>,
}

impl AnalysisPipeline {
    pub fn new(config: Arc<AppConfig>, metrics: Arc<Metrics>) -> AnalyzerResult<Self> {
        Ok(Self {
            prompt: PromptBuilder::new(&config.generation)?,
            client: UpstreamClient::new(&config.upstream)?,
            parser: ResponseParser::new(),
            config,
            metrics,
        })
    }

    pub async fn run(
        &self,
        session_id: Uuid,
        document: UploadedDocument,
    ) -> AnalyzerResult<AnalyzeData> {
        let mut logs = Vec::new();

        validate_upload(&document, &self.config.upload)?;
        let content_hash = document.content_hash();
        logs.push(format!(
            "Received {} ({} bytes, sha256 {})",
            document.filename, document.size, content_hash
        ));

        let target = self.config.upstream.target()?;
        let request = self.prompt.build(&document)?;

        let started = Instant::now();
        let reply = self.client.generate(&target, &request).await;
        let elapsed = started.elapsed();
        self.metrics.observe_upstream(elapsed.as_secs_f64());
        let reply = reply?;

        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            finish_reason = reply.finish_reason.as_deref().unwrap_or("unknown"),
            reply_chars = reply.text.len(),
            "Upstream analysis completed"
        );
        logs.push(format!(
            "Model replied in {} ms (finish reason {})",
            elapsed.as_millis(),
            reply.finish_reason.as_deref().unwrap_or("unknown")
        ));

        let outcome = self.parser.parse(&reply.text);
        self.metrics.record_parse(outcome.strategy.as_str());
        if outcome.strategy.is_degraded() {
            warn!("Model reply matched no known format, returning an empty result");
        } else if outcome.result.is_empty() {
            warn!(
                strategy = outcome.strategy.as_str(),
                "Model reply parsed but carried no content"
            );
        }
        logs.push(format!(
            "Parsed reply via {}: {} table(s), {} artwork(s)",
            outcome.strategy.as_str(),
            outcome.result.tables.len(),
            outcome.result.artworks.len()
        ));

        Ok(AnalyzeData {
            session_id,
            filename: document.filename,
            size: document.size,
            content_hash,
            summary: outcome.result.summary.clone(),
            structured_data: outcome.result,
            logs: self.config.analysis.include_logs.then_some(logs),
        })
    }
}
