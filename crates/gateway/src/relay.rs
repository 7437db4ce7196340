//! The relay: a same-origin forwarding endpoint for generation requests.
//!
//! Accepts `POST /api/generate` with `{model, payload}`, injects the
//! server-held API key, and forwards to the upstream generative API. The
//! upstream status and body come back verbatim, with one exception: an
//! empty upstream body is replaced by a synthesized JSON error so callers
//! never face an unparseable empty response. `Retry-After` is forwarded
//! when present.

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use lumina_domain::config::RelayConfig;
use lumina_domain::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// State & router
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Clone)]
pub struct RelayState {
    http: reqwest::Client,
    upstream_base_url: String,
    api_key: Option<String>,
    key_env: String,
}

impl RelayState {
    /// Build the relay state, resolving the upstream credential once at
    /// startup. A missing key is not fatal here — the health endpoint
    /// still works and generation requests answer with 500.
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let api_key = match config.auth.resolve() {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::warn!(error = %e, "no upstream API key; generation requests will fail");
                None
            }
        };

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http,
            upstream_base_url: config.upstream_base_url.trim_end_matches('/').to_string(),
            api_key,
            key_env: config.auth.env.clone(),
        })
    }
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    let state = RelayState::new(&config)?;
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "relay listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /api/health — liveness probe
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// POST /api/generate — credential injection + passthrough
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
}

async fn generate(State(state): State<RelayState>, Json(req): Json<GenerateRequest>) -> Response {
    let (model, payload) = match (req.model, req.payload) {
        (Some(model), Some(payload)) if !model.is_empty() => (model, payload),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "Request must include `model` and `payload`."})),
            )
                .into_response();
        }
    };

    let Some(ref api_key) = state.api_key else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": format!("Server API key not configured ({}).", state.key_env)
            })),
        )
            .into_response();
    };

    let url = format!(
        "{}/v1beta/models/{}:generateContent?key={}",
        state.upstream_base_url, model, api_key
    );
    tracing::debug!(model = %model, url = %redact_url_key(&url), "forwarding generation request");

    let upstream = match state
        .http
        .post(&url)
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "upstream request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Proxy failed", "details": e.to_string()})),
            )
                .into_response();
        }
    };

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let retry_after = upstream
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = upstream.text().await.unwrap_or_default();

    let mut response = if body.trim().is_empty() {
        // Never forward an empty body; synthesize a JSON error instead.
        (status, Json(empty_body_error(status))).into_response()
    } else {
        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    };

    if let Some(ra) = retry_after {
        if let Ok(value) = HeaderValue::from_str(&ra) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}

/// The body sent in place of an empty upstream response.
fn empty_body_error(status: StatusCode) -> Value {
    serde_json::json!({
        "error": {
            "message": "Empty response from upstream API",
            "status": status.as_u16(),
            "statusText": status.canonical_reason().unwrap_or(""),
        }
    })
}

/// Redact the API key from a URL before it reaches the logs.
fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state(api_key: Option<&str>) -> RelayState {
        RelayState {
            http: reqwest::Client::new(),
            upstream_base_url: "http://127.0.0.1:1".into(),
            api_key: api_key.map(str::to_string),
            key_env: "GEMINI_API_KEY".into(),
        }
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(test_state(Some("k")));
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn missing_model_or_payload_is_bad_request() {
        let app = router(test_state(Some("k")));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"payload": {}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Request must include `model` and `payload`.");
    }

    #[tokio::test]
    async fn missing_credential_is_server_error() {
        let app = router(test_state(None));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"model": "m", "payload": {}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn non_post_generate_is_method_not_allowed() {
        let app = router(test_state(Some("k")));
        let response = app
            .oneshot(Request::builder().uri("/api/generate").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn empty_body_error_carries_status_metadata() {
        let body = empty_body_error(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["message"], "Empty response from upstream API");
        assert_eq!(body["error"]["status"], 503);
        assert_eq!(body["error"]["statusText"], "Service Unavailable");
    }

    #[test]
    fn url_key_is_redacted_in_logs() {
        let url = "https://host/v1beta/models/m:generateContent?key=secret123";
        assert_eq!(
            redact_url_key(url),
            "https://host/v1beta/models/m:generateContent?key=[REDACTED]"
        );
        assert_eq!(redact_url_key("https://host/no-key"), "https://host/no-key");
    }
}
