use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub relay: RelayConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Pipeline (client side)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Settings for the client side of the pipeline: which relay to talk to,
/// which models to request, and how patiently to retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Relay generation endpoint (same-origin in the original deployment).
    #[serde(default = "d_relay_url")]
    pub relay_url: String,
    /// Model for analysis, flashcards, study guides, and performance.
    #[serde(default = "d_generation_model")]
    pub generation_model: String,
    /// Model for document Q&A and persona-driven content.
    #[serde(default = "d_document_model")]
    pub document_model: String,
    /// Model for speech synthesis.
    #[serde(default = "d_tts_model")]
    pub tts_model: String,
    /// Prebuilt voice identifier for speech synthesis.
    #[serde(default = "d_tts_voice")]
    pub tts_voice: String,
    #[serde(default = "d_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum retries after the initial attempt when the relay reports 503.
    #[serde(default = "d_max_retries")]
    pub max_retries: u32,
    /// Documents are truncated to this many characters before analysis.
    #[serde(default = "d_max_document_chars")]
    pub max_document_chars: usize,
}

fn d_relay_url() -> String {
    "http://127.0.0.1:8787/api/generate".into()
}
fn d_generation_model() -> String {
    "gemini-2.5-flash-preview-09-2025".into()
}
fn d_document_model() -> String {
    "gemini-2.0-flash".into()
}
fn d_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".into()
}
fn d_tts_voice() -> String {
    "Kore".into()
}
fn d_timeout_ms() -> u64 {
    120_000
}
fn d_max_retries() -> u32 {
    3
}
fn d_max_document_chars() -> usize {
    20_000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            relay_url: d_relay_url(),
            generation_model: d_generation_model(),
            document_model: d_document_model(),
            tts_model: d_tts_model(),
            tts_voice: d_tts_voice(),
            timeout_ms: d_timeout_ms(),
            max_retries: d_max_retries(),
            max_document_chars: d_max_document_chars(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Relay (server side)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Settings for the relay server that injects the upstream credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "d_host")]
    pub host: String,
    #[serde(default = "d_port")]
    pub port: u16,
    /// Base URL of the upstream generative API.
    #[serde(default = "d_upstream_base_url")]
    pub upstream_base_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
}

fn d_host() -> String {
    "127.0.0.1".into()
}
fn d_port() -> u16 {
    8787
}
fn d_upstream_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: d_host(),
            port: d_port(),
            upstream_base_url: d_upstream_base_url(),
            auth: AuthConfig::default(),
        }
    }
}

/// Where the relay finds the upstream API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Plaintext key in the config file. Works, but prefer `env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Name of the environment variable holding the key.
    #[serde(default = "d_key_env")]
    pub env: String,
}

fn d_key_env() -> String {
    "GEMINI_API_KEY".into()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { key: None, env: d_key_env() }
    }
}

impl AuthConfig {
    /// Resolve the upstream API key.
    ///
    /// Precedence:
    /// 1. `key` field (plaintext — warn)
    /// 2. `env` field (reads the named environment variable)
    /// 3. Error
    pub fn resolve(&self) -> Result<String> {
        if let Some(ref key) = self.key {
            tracing::warn!(
                "API key loaded from plaintext config field 'key' — \
                 prefer the 'env' mode instead"
            );
            return Ok(key.clone());
        }

        std::env::var(&self.env).map_err(|_| {
            Error::Auth(format!(
                "environment variable '{}' not set or not valid UTF-8",
                self.env
            ))
        })
    }
}
