//! Docsight Analyzer Service
//!
//! Accepts PDF uploads, sends them to a generative-AI model and returns the
//! extracted summary, tables and key figures as JSON.

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    serve, Router,
};
use docsight_utils::{init_logging, validate_model, AppConfig};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};

mod error;
mod handlers;
mod metrics;
mod middleware;
mod pipeline;
mod prompt;
mod routes;
mod upload;
mod upstream_client;

use handlers::metrics_handler;
use metrics::Metrics;
use middleware::{request_id_middleware, with_security_headers};
use pipeline::AnalysisPipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting Docsight Analyzer");

    validate_model(&config)?;
    if let Err(e) = config.upstream.target() {
        warn!("{}; /api/analyze will fail until this is set", e);
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(config)?;
    let app = create_app(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("Analyzer listening on {}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        .nest("/api", routes::create_api_routes())
        .route("/metrics", get(metrics_handler))
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(config.request_body_limit())),
        );

    with_security_headers(router).with_state(state)
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pipeline: Arc<AnalysisPipeline>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let config = Arc::new(config);
        let metrics = Arc::new(Metrics::new(&config.monitoring.prometheus_namespace)?);
        let pipeline = Arc::new(AnalysisPipeline::new(config.clone(), metrics.clone())?);

        Ok(Self {
            config,
            pipeline,
            metrics,
        })
    }
}
