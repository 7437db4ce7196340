//! Payload extraction from the upstream response envelope.
//!
//! Generated output is not guaranteed to be clean JSON even when JSON mode
//! was requested — models wrap payloads in markdown fences or surround
//! them with prose. Extraction is a two-stage fallback: strip fences and
//! parse directly, then hunt for the outermost `{...}` substring. All of
//! it is pure; running it twice on the same envelope yields the same
//! result.

use lumina_domain::error::{Error, ExtractionKind, Result};
use serde_json::Value;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Generated text plus the JSON payload found inside it, when one was
/// requested. When `parsed_json` is absent the raw text is non-empty —
/// an empty candidate is already an extraction failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPayload {
    pub raw_text: String,
    pub parsed_json: Option<Value>,
}

impl ExtractedPayload {
    /// The parsed payload, or `InvalidJson` for text-only extractions.
    pub fn json(&self) -> Result<&Value> {
        self.parsed_json
            .as_ref()
            .ok_or_else(|| Error::extraction(ExtractionKind::InvalidJson, "payload carries no JSON"))
    }
}

/// The first candidate's first content part's text. Anything missing along
/// that path — no candidates, no parts, empty text — is `NoCandidate`.
pub fn generated_text(envelope: &Value) -> Result<String> {
    let text = envelope
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|a| a.first())
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .unwrap_or("");

    if text.is_empty() {
        return Err(Error::extraction(
            ExtractionKind::NoCandidate,
            "no generated text in first candidate",
        ));
    }
    Ok(text.to_string())
}

/// Extract the JSON object a JSON-mode flow asked for.
pub fn extract_json(envelope: &Value) -> Result<ExtractedPayload> {
    let raw_text = generated_text(envelope)?;
    let cleaned = strip_fences(&raw_text);

    let parsed: Value = match serde_json::from_str(&cleaned) {
        Ok(v) => v,
        Err(_) => find_embedded_object(&cleaned)?,
    };

    Ok(ExtractedPayload { raw_text, parsed_json: Some(parsed) })
}

/// Extract the generated text for a freeform (non-JSON) flow.
pub fn extract_text(envelope: &Value) -> Result<ExtractedPayload> {
    let raw_text = generated_text(envelope)?;
    Ok(ExtractedPayload { raw_text, parsed_json: None })
}

/// Base64-decoded inline audio bytes from the first candidate's first part.
pub fn inline_audio(envelope: &Value) -> Result<Vec<u8>> {
    let data = envelope
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .and_then(|a| a.first())
        .and_then(|p| p.get("inlineData"))
        .and_then(|d| d.get("data"))
        .and_then(|d| d.as_str())
        .ok_or_else(|| {
            Error::extraction(ExtractionKind::NoCandidate, "no inline audio in first candidate")
        })?;

    BASE64
        .decode(data)
        .map_err(|e| Error::Audio(format!("invalid base64 audio payload: {e}")))
}

// ── Internal helpers ───────────────────────────────────────────────

/// Drop markdown code-fence markers and surrounding whitespace.
fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Greedy fallback: parse from the first `{` to the last `}`. Recovers the
/// common case of a JSON object wrapped in prose.
fn find_embedded_object(cleaned: &str) -> Result<Value> {
    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(v) = serde_json::from_str(&cleaned[start..=end]) {
                return Ok(v);
            }
        }
    }
    Err(Error::extraction(
        ExtractionKind::InvalidJson,
        "no parseable JSON object in generated text",
    ))
}
