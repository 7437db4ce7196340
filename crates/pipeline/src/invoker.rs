//! The resilient invoker: one relay call with bounded overload retry.
//!
//! Retries apply only to HTTP 503 (upstream overloaded), as an explicit
//! loop with an attempt counter rather than recursion. Delays are
//! 1s, 2s, 4s — `2^attempt` seconds, no jitter — and the relay's
//! `Retry-After` hint is carried on the final error but never used for
//! scheduling. Every other failure propagates immediately.

use std::time::Duration;

use lumina_domain::error::{Error, Result, UpstreamKind};
use serde_json::Value;

use crate::request::ModelRequest;
use crate::transport::{ProxyResponse, RelayTransport};

/// HTTP status the upstream uses to signal transient overload.
const OVERLOADED: u16 = 503;

pub struct ResilientInvoker<T: RelayTransport> {
    transport: T,
    /// Retries after the initial attempt; 3 means at most 4 round-trips.
    max_retries: u32,
}

impl<T: RelayTransport> ResilientInvoker<T> {
    pub fn new(transport: T, max_retries: u32) -> Self {
        Self { transport, max_retries }
    }

    /// Send the request and return the parsed upstream envelope.
    ///
    /// The returned value is the relay body as JSON; a 2xx body that does
    /// not parse degrades to `Value::Null`, which the extractor then
    /// rejects as having no candidate. The retry sleeps are plain timed
    /// suspensions — nothing is locked and concurrent invocations are
    /// unaffected.
    pub async fn invoke(&self, request: &ModelRequest) -> Result<Value> {
        let payload = request.to_payload();
        let mut attempt: u32 = 0;

        loop {
            let resp = self.transport.send(&request.model, &payload).await?;

            if resp.status == OVERLOADED && attempt < self.max_retries {
                let delay = Duration::from_millis(1000 * 2u64.pow(attempt));
                tracing::warn!(
                    model = %request.model,
                    attempt = attempt + 1,
                    max = self.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "relay overloaded, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return classify(resp);
        }
    }
}

/// Turn a final (post-retry) response into the upstream envelope or a
/// classified error.
fn classify(resp: ProxyResponse) -> Result<Value> {
    // An empty body is never parsed, whatever the status says.
    if resp.body_text.trim().is_empty() {
        return Err(Error::Upstream {
            kind: UpstreamKind::EmptyBody,
            message: "empty response body from relay".into(),
            status: Some(resp.status),
            retry_after_secs: resp.retry_after_secs,
        });
    }

    let body = resp.json();

    if !resp.is_success() {
        return Err(Error::Upstream {
            kind: UpstreamKind::HttpError,
            message: error_message(body.as_ref(), &resp),
            status: Some(resp.status),
            retry_after_secs: resp.retry_after_secs,
        });
    }

    if let Some(ref json) = body {
        if let Some(err) = json.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| err.as_str())
                .unwrap_or("API error")
                .to_string();
            return Err(Error::Upstream {
                kind: UpstreamKind::ApiError,
                message,
                status: Some(resp.status),
                retry_after_secs: resp.retry_after_secs,
            });
        }
    }

    Ok(body.unwrap_or(Value::Null))
}

/// Best error message available: `error.message`, then a top-level
/// `message`, then the raw body, then the bare status.
fn error_message(body: Option<&Value>, resp: &ProxyResponse) -> String {
    body.and_then(|j| {
        j.get("error")
            .and_then(|e| e.get("message"))
            .or_else(|| j.get("message"))
            .and_then(|m| m.as_str())
    })
    .map(str::to_string)
    .unwrap_or_else(|| {
        let text = resp.body_text.trim();
        if text.is_empty() {
            format!("HTTP {}", resp.status)
        } else {
            text.to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina_domain::error::ExtractionKind;

    fn resp(status: u16, body: &str) -> ProxyResponse {
        ProxyResponse { status, body_text: body.into(), retry_after_secs: None }
    }

    #[test]
    fn empty_body_is_never_parsed() {
        let err = classify(resp(200, "   ")).unwrap_err();
        match err {
            Error::Upstream { kind, status, .. } => {
                assert_eq!(kind, UpstreamKind::EmptyBody);
                assert_eq!(status, Some(200));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_success_uses_error_message_from_body() {
        let err = classify(resp(500, r#"{"error": {"message": "key not configured"}}"#))
            .unwrap_err();
        match err {
            Error::Upstream { kind, message, .. } => {
                assert_eq!(kind, UpstreamKind::HttpError);
                assert_eq!(message, "key not configured");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_success_falls_back_to_raw_body() {
        let err = classify(resp(502, "bad gateway")).unwrap_err();
        match err {
            Error::Upstream { kind, message, .. } => {
                assert_eq!(kind, UpstreamKind::HttpError);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn success_with_error_field_is_api_error() {
        let err = classify(resp(200, r#"{"error": {"message": "quota exhausted"}}"#))
            .unwrap_err();
        match err {
            Error::Upstream { kind, message, .. } => {
                assert_eq!(kind, UpstreamKind::ApiError);
                assert_eq!(message, "quota exhausted");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn success_returns_envelope() {
        let v = classify(resp(200, r#"{"candidates": [1]}"#)).unwrap();
        assert_eq!(v["candidates"][0], 1);
    }

    #[test]
    fn unparseable_success_body_degrades_to_null() {
        // The extractor downstream rejects this as NoCandidate.
        let v = classify(resp(200, "no json here at all")).unwrap();
        assert!(v.is_null());
        let err = crate::extract::generated_text(&v).unwrap_err();
        match err {
            Error::Extraction { kind, .. } => assert_eq!(kind, ExtractionKind::NoCandidate),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn retry_after_hint_is_carried_on_errors() {
        let r = ProxyResponse {
            status: 503,
            body_text: "overloaded".into(),
            retry_after_secs: Some(30),
        };
        match classify(r).unwrap_err() {
            Error::Upstream { retry_after_secs, .. } => assert_eq!(retry_after_secs, Some(30)),
            other => panic!("unexpected error: {other}"),
        }
    }
}
