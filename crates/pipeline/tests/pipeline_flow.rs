//! Integration tests for the invoker and the full pipeline — scripted
//! transport, no network. Retry timing runs under the paused tokio clock,
//! so the backoff schedule is asserted exactly and the tests stay fast
//! and deterministic.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use lumina_domain::config::PipelineConfig;
use lumina_domain::error::{Error, Result, UpstreamKind};
use lumina_domain::study::QuizDifficulty;
use lumina_pipeline::request::SourceMaterial;
use lumina_pipeline::transport::{ProxyResponse, RelayTransport};
use lumina_pipeline::{audio, ResilientInvoker, StudyPipeline};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scripted transport
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Pops one scripted response per call; repeats the last one when the
/// script runs dry. Counts round-trips.
struct ScriptedTransport {
    script: Mutex<VecDeque<ProxyResponse>>,
    attempts: AtomicU32,
}

impl ScriptedTransport {
    fn new(script: Vec<ProxyResponse>) -> Self {
        Self { script: Mutex::new(script.into()), attempts: AtomicU32::new(0) }
    }

    fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RelayTransport for &ScriptedTransport {
    async fn send(&self, _model: &str, _payload: &Value) -> Result<ProxyResponse> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let mut script = self.script.lock().unwrap();
        match script.len() {
            0 => panic!("transport called more times than scripted"),
            1 => Ok(script.front().unwrap().clone()),
            _ => Ok(script.pop_front().unwrap()),
        }
    }
}

fn overloaded() -> ProxyResponse {
    ProxyResponse { status: 503, body_text: r#"{"error": {"message": "The model is overloaded. Please try again later."}}"#.into(), retry_after_secs: None }
}

fn ok_envelope(text: &str) -> ProxyResponse {
    let body = serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    });
    ProxyResponse { status: 200, body_text: body.to_string(), retry_after_secs: None }
}

fn config() -> PipelineConfig {
    PipelineConfig::default()
}

fn pipeline(transport: &ScriptedTransport) -> StudyPipeline<&ScriptedTransport> {
    StudyPipeline::with_transport(&config(), transport)
}

fn image_source() -> SourceMaterial {
    SourceMaterial::image("image/jpeg", "QUJD")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Retry behavior
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test(start_paused = true)]
async fn persistent_overload_makes_four_attempts_with_exponential_delays() {
    let transport = ScriptedTransport::new(vec![overloaded()]);
    let pipeline = pipeline(&transport);

    let start = tokio::time::Instant::now();
    let err = pipeline
        .analyze(&image_source(), 10, QuizDifficulty::Same)
        .await
        .unwrap_err();

    // 1 initial + 3 retries, delayed 1s, 2s, 4s.
    assert_eq!(transport.attempts(), 4);
    assert_eq!(start.elapsed(), Duration::from_millis(7000));
    match err {
        Error::Upstream { kind, status, .. } => {
            assert_eq!(kind, UpstreamKind::HttpError);
            assert_eq!(status, Some(503));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn transient_overload_recovers_on_retry() {
    let analysis_text = r#"{"summary":"s","key_concepts":["a"],"analogy":"b","quiz":[{"question":"q","options":["a","b","c","d"],"answer":"b"}]}"#;
    let transport = ScriptedTransport::new(vec![overloaded(), ok_envelope(analysis_text)]);
    let pipeline = pipeline(&transport);

    let start = tokio::time::Instant::now();
    let result = pipeline.analyze(&image_source(), 1, QuizDifficulty::Same).await.unwrap();

    assert_eq!(transport.attempts(), 2);
    assert_eq!(start.elapsed(), Duration::from_millis(1000));
    assert_eq!(result.quiz[0].answer, "b");
}

#[tokio::test]
async fn other_server_errors_are_not_retried() {
    let transport = ScriptedTransport::new(vec![ProxyResponse {
        status: 500,
        body_text: r#"{"error": {"message": "Server API key not configured (GEMINI_API_KEY)."}}"#.into(),
        retry_after_secs: None,
    }]);
    let invoker = ResilientInvoker::new(&transport, 3);
    let request = lumina_pipeline::RequestBuilder::new(config()).speech("hi");

    let err = invoker.invoke(&request).await.unwrap_err();
    assert_eq!(transport.attempts(), 1);
    match err {
        Error::Upstream { kind, message, .. } => {
            assert_eq!(kind, UpstreamKind::HttpError);
            assert!(message.contains("GEMINI_API_KEY"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_success_body_fails_without_parsing() {
    let transport = ScriptedTransport::new(vec![ProxyResponse {
        status: 200,
        body_text: String::new(),
        retry_after_secs: None,
    }]);
    let pipeline = pipeline(&transport);

    let err = pipeline.explanation("osmosis", "cells", false).await.unwrap_err();
    assert_eq!(transport.attempts(), 1);
    match err {
        Error::Upstream { kind, status, .. } => {
            assert_eq!(kind, UpstreamKind::EmptyBody);
            assert_eq!(status, Some(200));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn api_error_field_propagates_as_api_error() {
    let transport = ScriptedTransport::new(vec![ProxyResponse {
        status: 200,
        body_text: r#"{"error": {"message": "safety block"}}"#.into(),
        retry_after_secs: None,
    }]);
    let pipeline = pipeline(&transport);

    let err = pipeline.explanation("osmosis", "cells", false).await.unwrap_err();
    match err {
        Error::Upstream { kind, message, .. } => {
            assert_eq!(kind, UpstreamKind::ApiError);
            assert_eq!(message, "safety block");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// End-to-end flows
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn fenced_quiz_payload_is_extracted_and_repaired() {
    let fenced = "```json\n{\"summary\":\"x\",\"key_concepts\":[],\"analogy\":\"y\",\"quiz\":[{\"question\":\"q\",\"options\":[\"a\",\"b\"],\"answer\":\"a\"}]}\n```";
    let transport = ScriptedTransport::new(vec![ok_envelope(fenced)]);
    let pipeline = pipeline(&transport);

    let result = pipeline.analyze(&image_source(), 1, QuizDifficulty::Same).await.unwrap();

    assert_eq!(result.summary, "x");
    assert_eq!(result.analogy, "y");
    assert_eq!(result.quiz[0].options, vec!["a", "b", "C", "D"]);
    assert_eq!(result.quiz[0].answer, "a");
}

#[tokio::test]
async fn document_flow_caps_questions_and_keeps_local_metadata() {
    let questions: Vec<Value> = (0..7)
        .map(|i| serde_json::json!({"id": format!("q{i}"), "question": "?", "difficulty": "expert", "topic": "t", "context": "c"}))
        .collect();
    let body = serde_json::json!({
        "summary": "doc summary",
        "key_topics": ["k1"],
        "main_themes": ["m1"],
        "questions": questions
    });
    let transport = ScriptedTransport::new(vec![ok_envelope(&body.to_string())]);
    let pipeline = pipeline(&transport);

    let result = pipeline.document_analysis("My Notes", "0123456789").await.unwrap();

    assert_eq!(result.questions.len(), 5);
    assert_eq!(result.title, "My Notes");
    assert_eq!(result.length, 10);
    assert_eq!(result.key_topics, vec!["k1"]);
}

#[tokio::test]
async fn speech_flow_yields_a_playable_wave_round_trip() {
    let pcm: Vec<u8> = (0..64u8).collect();
    use base64::Engine as _;
    let encoded = base64::engine::general_purpose::STANDARD.encode(&pcm);
    let body = serde_json::json!({
        "candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "audio/pcm", "data": encoded}}]}}]
    });
    let transport = ScriptedTransport::new(vec![ProxyResponse {
        status: 200,
        body_text: body.to_string(),
        retry_after_secs: None,
    }]);
    let pipeline = pipeline(&transport);

    let wav = pipeline.speech("read this aloud").await.unwrap();
    assert_eq!(audio::wav_to_pcm16(&wav).unwrap(), pcm.as_slice());
}

#[tokio::test]
async fn persona_variants_split_and_cap() {
    let listing = "1. Variant one body.\n2. Variant two body.\n3. Variant three body.\n4. Variant four body.";
    let transport = ScriptedTransport::new(vec![ok_envelope(listing)]);
    let pipeline = pipeline(&transport);

    let persona = lumina_domain::persona::SystemPersona::marketing_copywriter();
    let request = lumina_domain::persona::ContentRequest {
        content_type: lumina_domain::persona::ContentType::MarketingCopy,
        topic: "launch email".into(),
        target_audience: "existing users".into(),
        requirements: vec!["short".into()],
        constraints: None,
        output_format: None,
        custom_context: None,
    };

    let variants = pipeline.persona_variants(&persona, &request, 3).await.unwrap();
    assert_eq!(variants.len(), 3);
    assert!(variants.iter().all(|v| v.persona == "MarketingPro"));
    assert!(variants.iter().all(|v| v.token_estimate > 0));
}
