//! Relay transport: the seam between the pipeline and the network.
//!
//! [`RelayTransport`] is the trait the invoker talks to; the production
//! implementation posts `{model, payload}` to the relay over HTTP. Tests
//! substitute scripted implementations to exercise retry behavior without
//! a server.

use std::time::Duration;

use lumina_domain::config::PipelineConfig;
use lumina_domain::error::{Error, Result};
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response reading
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A relay response reduced to what the invoker needs. Created per call,
/// discarded after extraction.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: u16,
    /// The full body as text; empty bodies stay `""`, never an error.
    pub body_text: String,
    /// Parsed `Retry-After` header, when the relay forwarded one.
    pub retry_after_secs: Option<u64>,
}

impl ProxyResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Lenient JSON view of the body. Empty or non-JSON bodies are `None`;
    /// this never fails.
    pub fn json(&self) -> Option<Value> {
        if self.body_text.trim().is_empty() {
            return None;
        }
        serde_json::from_str(&self.body_text).ok()
    }
}

/// Consume a response into a [`ProxyResponse`].
///
/// The body is always read as text first — the relay is supposed to send
/// JSON, but an empty or malformed body must not take the pipeline down
/// here; classification happens in the invoker.
pub async fn read_response(resp: reqwest::Response) -> Result<ProxyResponse> {
    let status = resp.status().as_u16();
    let retry_after_secs = resp
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok());
    let body_text = resp.text().await.map_err(from_reqwest)?;

    Ok(ProxyResponse { status, body_text, retry_after_secs })
}

/// Convert a [`reqwest::Error`] into the domain [`Error`] type. Anything
/// that happens before a usable response exists is a network failure.
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    Error::Network(e.to_string())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Transport trait
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One relay round-trip: serialize, send, read.
#[async_trait::async_trait]
pub trait RelayTransport: Send + Sync {
    /// POST `{model, payload}` to the relay and read the full response.
    /// Fails only on transport-level errors ([`Error::Network`]); any
    /// received response, however broken, comes back as a [`ProxyResponse`].
    async fn send(&self, model: &str, payload: &Value) -> Result<ProxyResponse>;
}

/// Production transport over `reqwest`.
pub struct HttpRelayTransport {
    http: reqwest::Client,
    relay_url: String,
}

impl HttpRelayTransport {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        Ok(Self { http, relay_url: config.relay_url.clone() })
    }
}

#[async_trait::async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn send(&self, model: &str, payload: &Value) -> Result<ProxyResponse> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(model = %model, trace_id = %trace_id, "relay request");

        let resp = self
            .http
            .post(&self.relay_url)
            .header("Content-Type", "application/json")
            .header("X-Trace-Id", &trace_id)
            .json(&serde_json::json!({"model": model, "payload": payload}))
            .send()
            .await
            .map_err(from_reqwest)?;

        read_response(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_has_no_json_view() {
        let resp = ProxyResponse { status: 200, body_text: "".into(), retry_after_secs: None };
        assert!(resp.json().is_none());
        assert!(resp.is_success());
    }

    #[test]
    fn non_json_body_has_no_json_view() {
        let resp = ProxyResponse {
            status: 200,
            body_text: "service temporarily unavailable".into(),
            retry_after_secs: None,
        };
        assert!(resp.json().is_none());
    }

    #[test]
    fn json_body_parses() {
        let resp = ProxyResponse {
            status: 200,
            body_text: r#"{"candidates": []}"#.into(),
            retry_after_secs: None,
        };
        assert!(resp.json().unwrap().get("candidates").is_some());
    }
}
