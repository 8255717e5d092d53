use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub auth_attempts_total: IntCounterVec,
    pub guard_decisions_total: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

impl Metrics {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )?;
        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )?;
        let auth_attempts_total = IntCounterVec::new(
            Opts::new(
                "portal_auth_attempts_total",
                "Login and registration attempts by outcome",
            ),
            &["operation", "outcome"],
        )?;
        let guard_decisions_total = IntCounterVec::new(
            Opts::new(
                "portal_guard_decisions_total",
                "Section navigation checks by decision",
            ),
            &["section", "decision"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(auth_attempts_total.clone()))?;
        registry.register(Box::new(guard_decisions_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            auth_attempts_total,
            guard_decisions_total,
        })
    }
}

/// Registers the portal's collectors. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_some() {
        return Ok(());
    }
    let _ = METRICS.set(Metrics::new()?);
    Ok(())
}

/// `None` until [`init_metrics`] has run; recording is then skipped.
pub fn metrics() -> Option<&'static Metrics> {
    METRICS.get()
}

pub fn record_auth_attempt(operation: &str, outcome: &str) {
    if let Some(m) = metrics() {
        m.auth_attempts_total
            .with_label_values(&[operation, outcome])
            .inc();
    }
}

pub fn record_guard_decision(section: &str, decision: &str) {
    if let Some(m) = metrics() {
        m.guard_decisions_total
            .with_label_values(&[section, decision])
            .inc();
    }
}

pub fn record_http_request(method: &str, path: &str, status: &str, seconds: f64) {
    if let Some(m) = metrics() {
        m.http_requests_total
            .with_label_values(&[method, path, status])
            .inc();
        m.http_request_duration_seconds
            .with_label_values(&[method, path, status])
            .observe(seconds);
    }
}

/// Text exposition of every registered collector.
pub fn get_metrics() -> Result<String, prometheus::Error> {
    let Some(m) = metrics() else {
        return Ok(String::new());
    };

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&m.registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
