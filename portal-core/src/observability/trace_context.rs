//! Trace propagation for calls the portal makes to the marketplace backend
//! and the extraction service.
//!
//! Every outbound request carries W3C `traceparent`/`tracestate` headers taken
//! from the current span, so a collector can stitch backend spans under ours.
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub const TRACEPARENT_HEADER: &str = "traceparent";
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Correlation id set by the request-id middleware and echoed to clients.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Writes the current span's context into `headers`.
///
/// Leaves `headers` untouched when the span carries no sampled OpenTelemetry
/// context, which is the case whenever no OTLP endpoint is configured.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let context = Span::current().context();
    let span = context.span();
    let span_context = span.span_context();

    if !span_context.is_valid() {
        return;
    }

    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );
    if let Ok(value) = HeaderValue::from_str(&traceparent) {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty()
        && let Ok(value) = HeaderValue::from_str(&tracestate)
    {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

/// A `reqwest` request whose trace headers are filled in when it is sent.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self { request }
    }

    pub fn json<T: serde::Serialize + ?Sized>(self, body: &T) -> Self {
        Self::new(self.request.json(body))
    }

    /// URL-encoded body, for backend endpoints that bind request parameters.
    pub fn form<T: serde::Serialize + ?Sized>(self, body: &T) -> Self {
        Self::new(self.request.form(body))
    }

    pub fn query<T: serde::Serialize + ?Sized>(self, query: &T) -> Self {
        Self::new(self.request.query(query))
    }

    pub fn multipart(self, form: reqwest::multipart::Form) -> Self {
        Self::new(self.request.multipart(form))
    }

    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        self.request.headers(headers).send().await
    }
}

pub trait TracedClientExt {
    fn traced_get(&self, url: &str) -> TracedRequest;
    fn traced_post(&self, url: &str) -> TracedRequest;
    fn traced_put(&self, url: &str) -> TracedRequest;
    fn traced_delete(&self, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced_get(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.get(url))
    }

    fn traced_post(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.post(url))
    }

    fn traced_put(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.put(url))
    }

    fn traced_delete(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.delete(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_is_injected_outside_a_traced_span() {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);
        assert!(headers.get(TRACEPARENT_HEADER).is_none());
        assert!(headers.get(TRACESTATE_HEADER).is_none());
    }

    #[test]
    fn builds_requests_for_every_verb() {
        let client = reqwest::Client::new();
        let url = "http://localhost:8080/api/job-offers/1";

        for (traced, expected) in [
            (client.traced_get(url), reqwest::Method::GET),
            (client.traced_post(url), reqwest::Method::POST),
            (client.traced_put(url), reqwest::Method::PUT),
            (client.traced_delete(url), reqwest::Method::DELETE),
        ] {
            let request = traced.query(&[("active", "true")]).request.build().unwrap();
            assert_eq!(request.method(), expected);
            assert_eq!(request.url().query(), Some("active=true"));
        }
    }
}
