//! Model request assembly.
//!
//! One builder per use case. Every builder states the exact JSON schema it
//! expects inside the prompt text itself, so extraction and validation
//! never need builder-specific logic.

use lumina_domain::config::PipelineConfig;
use lumina_domain::document::{DocumentQuestion, ResponseFeedback};
use lumina_domain::persona::{ContentRequest, ContentType, SystemPersona};
use lumina_domain::study::{AnalysisResult, QuizDifficulty};
use serde_json::Value;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A fully assembled model invocation, ready for the relay.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    /// Ordered prompt parts; builders always produce at least one.
    pub parts: Vec<PromptPart>,
    pub system_instruction: Option<String>,
    pub options: GenerationOptions,
}

#[derive(Debug, Clone)]
pub enum PromptPart {
    Text(String),
    InlineMedia { mime_type: String, data_base64: String },
}

/// Generation options mapped onto the upstream `generationConfig`.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
    /// When `true`, instruct the model to emit valid JSON as its whole output.
    pub response_json: bool,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub response_modalities: Option<Vec<String>>,
    /// Prebuilt voice for speech synthesis.
    pub voice: Option<String>,
}

impl ModelRequest {
    /// Serialize to the upstream wire shape:
    /// `{contents, systemInstruction?, generationConfig?}`.
    pub fn to_payload(&self) -> Value {
        let parts: Vec<Value> = self
            .parts
            .iter()
            .map(|p| match p {
                PromptPart::Text(text) => serde_json::json!({"text": text}),
                PromptPart::InlineMedia { mime_type, data_base64 } => serde_json::json!({
                    "inlineData": {"mimeType": mime_type, "data": data_base64}
                }),
            })
            .collect();

        let mut body = serde_json::json!({
            "contents": [{"parts": parts}],
        });

        if let Some(ref si) = self.system_instruction {
            body["systemInstruction"] = serde_json::json!({"parts": [{"text": si}]});
        }

        let mut gen_config = serde_json::json!({});
        if let Some(temp) = self.options.temperature {
            gen_config["temperature"] = serde_json::json!(temp);
        }
        if let Some(max) = self.options.max_output_tokens {
            gen_config["maxOutputTokens"] = serde_json::json!(max);
        }
        if self.options.response_json {
            gen_config["responseMimeType"] = serde_json::json!("application/json");
        }
        if let Some(top_p) = self.options.top_p {
            gen_config["topP"] = serde_json::json!(top_p);
        }
        if let Some(top_k) = self.options.top_k {
            gen_config["topK"] = serde_json::json!(top_k);
        }
        if let Some(ref modalities) = self.options.response_modalities {
            gen_config["responseModalities"] = serde_json::json!(modalities);
        }
        if let Some(ref voice) = self.options.voice {
            gen_config["speechConfig"] = serde_json::json!({
                "voiceConfig": {"prebuiltVoiceConfig": {"voiceName": voice}}
            });
        }
        if gen_config.as_object().is_some_and(|o| !o.is_empty()) {
            body["generationConfig"] = gen_config;
        }

        body
    }
}

/// The source material an analysis is built from.
#[derive(Debug, Clone)]
pub enum SourceMaterial {
    Image { mime_type: String, base64: String },
    VideoId(String),
}

impl SourceMaterial {
    /// Build an image source, tolerating a `data:` URL prefix.
    pub fn image(mime_type: impl Into<String>, base64: impl Into<String>) -> Self {
        let raw: String = base64.into();
        // Data URLs carry "data:image/png;base64," before the payload.
        let clean = match raw.split_once(',') {
            Some((_, payload)) => payload.to_string(),
            None => raw,
        };
        SourceMaterial::Image { mime_type: mime_type.into(), base64: clean }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Builders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const ANALYSIS_SCHEMA: &str = r#"{"summary": "2-3 sentences", "key_concepts": ["c1", "c2", "c3", "c4", "c5"], "analogy": "one sentence", "quiz": [{"question": "q1", "options": ["a", "b", "c", "d"], "answer": "correct option"}]}"#;

const DOCUMENT_SYSTEM_PROMPT: &str = r#"You are an expert educational curriculum designer and critical thinking instructor.
Your task is to analyze a document and generate exactly 5 unique, complex, thought-provoking questions.

Requirements:
1. Questions should progressively increase in complexity (2 intermediate, 2 advanced, 1 expert level)
2. Each question must target a different key concept or theme from the document
3. Questions should require synthesis, analysis, or application of knowledge (not simple recall)
4. Provide the specific context/excerpt from the document each question is based on
5. Return ONLY valid JSON, no other text

Use this exact JSON format:
{
  "summary": "2-3 sentence comprehensive summary of the document",
  "key_topics": ["topic1", "topic2", "topic3", "topic4", "topic5"],
  "main_themes": ["theme1", "theme2", "theme3"],
  "questions": [
    {
      "id": "q1",
      "question": "the actual question text",
      "difficulty": "intermediate" | "advanced" | "expert",
      "topic": "the topic this question covers",
      "context": "exact excerpt or concept from document this is based on"
    }
  ]
}"#;

/// Assembles one [`ModelRequest`] per pipeline flow.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: PipelineConfig,
}

impl RequestBuilder {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Quiz analysis of an image or a YouTube video, unified over the
    /// source variant: only the prompt parts differ between the two.
    pub fn analysis(
        &self,
        source: &SourceMaterial,
        question_count: u32,
        difficulty: QuizDifficulty,
    ) -> ModelRequest {
        let level = difficulty.prompt_word();
        let parts = match source {
            SourceMaterial::Image { mime_type, base64 } => vec![
                PromptPart::Text(format!(
                    "Create exactly {question_count} {level} difficulty multiple choice \
                     questions from this image. Return ONLY this JSON format, no other \
                     text:\n{ANALYSIS_SCHEMA}"
                )),
                PromptPart::InlineMedia {
                    mime_type: mime_type.clone(),
                    data_base64: base64.clone(),
                },
            ],
            SourceMaterial::VideoId(id) => vec![PromptPart::Text(format!(
                "Analyze YouTube video ID: {id}. Create exactly {question_count} {level} \
                 difficulty questions. Return ONLY this JSON format, no other \
                 text:\n{ANALYSIS_SCHEMA}"
            ))],
        };

        ModelRequest {
            model: self.config.generation_model.clone(),
            parts,
            system_instruction: None,
            options: GenerationOptions {
                temperature: Some(0.7),
                max_output_tokens: Some(4096),
                response_json: true,
                ..Default::default()
            },
        }
    }

    /// Short free-text explanation of a concept, or of why an answer is
    /// correct, in the context of a prior summary.
    pub fn explanation(&self, term: &str, summary: &str, quiz_context: bool) -> ModelRequest {
        let prompt = if quiz_context {
            format!(
                "Explain why \"{term}\" is the correct answer in the context of: \
                 {summary}. Keep it brief (2-3 sentences)."
            )
        } else {
            format!(
                "Explain the concept \"{term}\" simply and briefly (max 2 sentences) \
                 in the context of: {summary}"
            )
        };

        ModelRequest {
            model: self.config.generation_model.clone(),
            parts: vec![PromptPart::Text(prompt)],
            system_instruction: None,
            options: GenerationOptions::default(),
        }
    }

    /// Speech synthesis of arbitrary text with the configured voice.
    pub fn speech(&self, text: &str) -> ModelRequest {
        ModelRequest {
            model: self.config.tts_model.clone(),
            parts: vec![PromptPart::Text(text.to_string())],
            system_instruction: None,
            options: GenerationOptions {
                response_modalities: Some(vec!["AUDIO".into()]),
                voice: Some(self.config.tts_voice.clone()),
                ..Default::default()
            },
        }
    }

    /// Flashcards derived from a prior analysis.
    pub fn flashcards(&self, analysis: &AnalysisResult) -> ModelRequest {
        let prompt = format!(
            "Based on this learning material:\n\
             Summary: {}\n\
             Key Concepts: {}\n\n\
             Generate flashcards for studying. Return ONLY valid JSON (no markdown):\n\
             {{\n  \"flashcards\": [\n    {{\"term\": \"term1\", \"definition\": \"def1\", \"example\": \"ex1\"}},\n    {{\"term\": \"term2\", \"definition\": \"def2\", \"example\": \"ex2\"}}\n  ]\n}}\n\n\
             Create 8-12 flashcards covering the key concepts. Each must have term, \
             definition, and example.",
            analysis.summary,
            analysis.key_concepts.join(", "),
        );

        self.json_request(&self.config.generation_model, prompt)
    }

    /// Study guide derived from a prior analysis; up to three quiz
    /// questions are included as context.
    pub fn study_guide(&self, analysis: &AnalysisResult) -> ModelRequest {
        let question_context = analysis
            .quiz
            .iter()
            .take(3)
            .map(|q| q.question.as_str())
            .collect::<Vec<_>>()
            .join(" | ");

        let prompt = format!(
            "Create a comprehensive study guide based on:\n\
             Summary: {}\n\
             Key Concepts: {}\n\
             Quiz Questions: {}\n\n\
             Return ONLY valid JSON (no markdown):\n\
             {{\n  \"title\": \"Study Guide Title\",\n  \"sections\": [\n    {{\"heading\": \"Section 1\", \"content\": \"detailed content...\"}},\n    {{\"heading\": \"Section 2\", \"content\": \"detailed content...\"}}\n  ],\n  \"keyTakeaways\": [\"takeaway1\", \"takeaway2\", \"takeaway3\"]\n}}\n\n\
             Create 4-5 sections with practical, detailed content suitable for deep \
             learning.",
            analysis.summary,
            analysis.key_concepts.join(", "),
            question_context,
        );

        self.json_request(&self.config.generation_model, prompt)
    }

    /// Qualitative performance feedback for a finished quiz. The numeric
    /// score is computed locally; the model only sees it as context.
    pub fn performance(
        &self,
        analysis: &AnalysisResult,
        correct: u32,
        total: u32,
        accuracy: u32,
    ) -> ModelRequest {
        let topic: String = analysis.summary.chars().take(100).collect();
        let prompt = format!(
            "Analyze student performance:\n\
             - Score: {correct}/{total} ({accuracy}%)\n\
             - Topic: {topic}\n\
             - Concepts covered: {}\n\n\
             Return ONLY valid JSON (no markdown):\n\
             {{\n  \"strengths\": [\"strength1\", \"strength2\"],\n  \"growthAreas\": [\"area1\", \"area2\"],\n  \"recommendations\": [\"recommendation1\", \"recommendation2\"]\n}}\n\n\
             Provide personalized feedback based on their performance.",
            analysis.key_concepts.join(", "),
        );

        self.json_request(&self.config.generation_model, prompt)
    }

    /// Document analysis with exactly five complex questions. The document
    /// is truncated to the configured limit before prompting.
    pub fn document_analysis(&self, title: &str, document_text: &str) -> ModelRequest {
        let max = self.config.max_document_chars;
        let truncated: String = document_text.chars().take(max).collect();
        let is_truncated = document_text.chars().count() > max;

        let truncation_note = if is_truncated {
            format!("[NOTE: Document was truncated to {max} characters]\n")
        } else {
            String::new()
        };
        let user_prompt = format!(
            "Analyze the following document and generate exactly 5 unique, complex \
             questions.\n{truncation_note}\n\
             DOCUMENT TITLE: {title}\n\n\
             DOCUMENT TEXT:\n{truncated}"
        );

        ModelRequest {
            model: self.config.document_model.clone(),
            parts: vec![PromptPart::Text(user_prompt)],
            system_instruction: Some(DOCUMENT_SYSTEM_PROMPT.to_string()),
            options: GenerationOptions {
                temperature: Some(0.8),
                max_output_tokens: Some(3000),
                response_json: true,
                top_p: Some(0.95),
                top_k: Some(40),
                ..Default::default()
            },
        }
    }

    /// Grade a student's free-text answer to a document question.
    pub fn evaluate_response(
        &self,
        question: &DocumentQuestion,
        user_response: &str,
        document_context: &str,
        feedback: &ResponseFeedback,
    ) -> ModelRequest {
        let difficulty = question.difficulty.as_str();
        let prompt = format!(
            "You are an expert educator evaluating a student's response to a complex \
             question.\n\n\
             QUESTION: {}\n\
             DIFFICULTY: {difficulty}\n\
             EXPECTED CONTEXT: {}\n\n\
             STUDENT'S RESPONSE: {user_response}\n\n\
             FEEDBACK FROM STUDENT:\n\
             - Clarity of question: {}/5\n\
             - Perceived difficulty: {}/5\n\
             - Student notes: {}\n\n\
             DOCUMENT CONTEXT:\n{document_context}\n\n\
             Evaluate the response in a single turn and provide:\n\
             1. A brief evaluation (2-3 sentences)\n\
             2. A score from 0-100\n\
             3. Up to 3 specific suggestions for improvement\n\n\
             Return ONLY this JSON format:\n\
             {{\n  \"evaluation\": \"your evaluation text\",\n  \"score\": 85,\n  \"suggestions\": [\"suggestion1\", \"suggestion2\", \"suggestion3\"]\n}}",
            question.question,
            question.context,
            feedback.clarity,
            feedback.difficulty,
            feedback.notes.as_deref().unwrap_or("None provided"),
        );

        ModelRequest {
            model: self.config.document_model.clone(),
            parts: vec![PromptPart::Text(prompt)],
            system_instruction: None,
            options: GenerationOptions {
                temperature: Some(0.7),
                max_output_tokens: Some(500),
                response_json: true,
                ..Default::default()
            },
        }
    }

    /// Persona-driven content generation. The persona is rendered as the
    /// system instruction so the voice stays stable across a session.
    pub fn persona_content(
        &self,
        persona: &SystemPersona,
        request: &ContentRequest,
    ) -> ModelRequest {
        let opening = if request.content_type == ContentType::CodeSnippet {
            "production-ready code"
        } else {
            "high-quality content"
        };

        let mut prompt = format!(
            "Generate {opening} for the following request:\n\n\
             CONTENT TYPE: {}\n\
             TOPIC: {}\n\
             TARGET AUDIENCE: {}\n\n\
             REQUIREMENTS:\n{}",
            request.content_type.as_str(),
            request.topic,
            request.target_audience,
            bullet_list(&request.requirements),
        );
        if let Some(ref constraints) = request.constraints {
            prompt.push_str(&format!(
                "\n\nADDITIONAL CONSTRAINTS:\n{}",
                bullet_list(constraints)
            ));
        }
        if let Some(ref output_format) = request.output_format {
            prompt.push_str(&format!("\n\nOUTPUT FORMAT:\n{output_format}"));
        }
        if let Some(ref context) = request.custom_context {
            prompt.push_str(&format!("\n\nADDITIONAL CONTEXT:\n{context}"));
        }
        prompt.push_str(
            "\n\nGenerate the complete, final output now. Do not ask for \
             clarification or provide alternatives. Provide only the content itself, \
             ready for immediate use.",
        );

        ModelRequest {
            model: self.config.document_model.clone(),
            parts: vec![PromptPart::Text(prompt)],
            system_instruction: Some(persona.system_prompt()),
            options: GenerationOptions {
                temperature: Some(0.8),
                max_output_tokens: Some(4000),
                top_p: Some(0.95),
                top_k: Some(40),
                ..Default::default()
            },
        }
    }

    /// Multiple distinct variants of the same content request, generated
    /// in a single call as a numbered list.
    pub fn persona_variants(
        &self,
        persona: &SystemPersona,
        request: &ContentRequest,
        variant_count: usize,
    ) -> ModelRequest {
        let prompt = format!(
            "Generate {variant_count} DISTINCT VARIANTS of {} content for the \
             following request.\n\
             Each variant should offer a different approach or angle while \
             maintaining the core message and persona.\n\n\
             TOPIC: {}\n\
             TARGET AUDIENCE: {}\n\n\
             REQUIREMENTS:\n{}\n\n\
             Format your response as a numbered list with clear separation between \
             variants.\n\
             Each variant should be complete and standalone.",
            request.content_type.as_str(),
            request.topic,
            request.target_audience,
            bullet_list(&request.requirements),
        );

        ModelRequest {
            model: self.config.document_model.clone(),
            parts: vec![PromptPart::Text(prompt)],
            system_instruction: Some(persona.system_prompt()),
            options: GenerationOptions {
                temperature: Some(0.9),
                max_output_tokens: Some(4000),
                top_p: Some(0.95),
                top_k: Some(40),
                ..Default::default()
            },
        }
    }

    // ── Internal helpers ───────────────────────────────────────────

    /// A single-text-part JSON-mode request with default sampling.
    fn json_request(&self, model: &str, prompt: String) -> ModelRequest {
        ModelRequest {
            model: model.to_string(),
            parts: vec![PromptPart::Text(prompt)],
            system_instruction: None,
            options: GenerationOptions { response_json: true, ..Default::default() },
        }
    }
}

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")
}
