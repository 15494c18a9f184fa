//! Prometheus metrics for the analyze endpoint.

use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    requests: IntCounterVec,
    upstream_duration: Histogram,
    parse_strategy: IntCounterVec,
}

impl Metrics {
    pub fn new(namespace: &str) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("analyze_requests_total", "Analyze requests by outcome").namespace(namespace),
            &["outcome"],
        )?;
        let upstream_duration = Histogram::with_opts(
            HistogramOpts::new(
                "upstream_request_duration_seconds",
                "Latency of generateContent calls",
            )
            .namespace(namespace)
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 60.0, 120.0]),
        )?;
        let parse_strategy = IntCounterVec::new(
            Opts::new("parse_strategy_total", "Model replies by parse strategy").namespace(namespace),
            &["strategy"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(upstream_duration.clone()))?;
        registry.register(Box::new(parse_strategy.clone()))?;

        Ok(Self {
            registry,
            requests,
            upstream_duration,
            parse_strategy,
        })
    }

    pub fn record_request(&self, outcome: &str) {
        self.requests.with_label_values(&[outcome]).inc();
    }

    pub fn observe_upstream(&self, seconds: f64) {
        self.upstream_duration.observe(seconds);
    }

    pub fn record_parse(&self, strategy: &str) {
        self.parse_strategy.with_label_values(&[strategy]).inc();
    }

    pub fn render(&self) -> String {
        TextEncoder::new()
            .encode_to_string(&self.registry.gather())
            .unwrap_or_else(|_| "Error encoding metrics".to_string())
    }
}
