//! The high-level pipeline facade.
//!
//! One method per application flow, each composing the same stages:
//! build → invoke (with overload retry) → extract → validate. The facade
//! holds no mutable state; every call is an independent future, and
//! concurrent calls share nothing but the connection pool. There is no
//! cancellation: a started invocation runs to completion or failure, and
//! callers that stop caring simply drop the result.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use lumina_domain::config::PipelineConfig;
use lumina_domain::document::{DocumentAnalysis, DocumentQuestion, ResponseFeedback};
use lumina_domain::error::Result;
use lumina_domain::persona::{ContentRequest, GeneratedContent, SystemPersona};
use lumina_domain::study::{
    AnalysisResult, Flashcard, PerformanceAnalysis, QuizDifficulty, ResponseEvaluation,
    StudyGuide,
};

use crate::audio;
use crate::extract;
use crate::invoker::ResilientInvoker;
use crate::request::{RequestBuilder, SourceMaterial};
use crate::transport::{HttpRelayTransport, RelayTransport};
use crate::validate;

/// Variants come back as a numbered list; split on the numbering.
static VARIANT_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\d+\.\s+").expect("valid variant-split pattern"));

pub struct StudyPipeline<T: RelayTransport> {
    builder: RequestBuilder,
    invoker: ResilientInvoker<T>,
}

impl StudyPipeline<HttpRelayTransport> {
    /// Production pipeline over HTTP.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let transport = HttpRelayTransport::new(config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: RelayTransport> StudyPipeline<T> {
    /// Pipeline over an arbitrary transport (tests use scripted ones).
    pub fn with_transport(config: &PipelineConfig, transport: T) -> Self {
        Self {
            builder: RequestBuilder::new(config.clone()),
            invoker: ResilientInvoker::new(transport, config.max_retries),
        }
    }

    /// Analyze source material into a summary, concepts, analogy, and quiz.
    pub async fn analyze(
        &self,
        source: &SourceMaterial,
        question_count: u32,
        difficulty: QuizDifficulty,
    ) -> Result<AnalysisResult> {
        let request = self.builder.analysis(source, question_count, difficulty);
        let envelope = self.invoker.invoke(&request).await?;
        let payload = extract::extract_json(&envelope)?;
        validate::analysis(payload.json()?)
    }

    /// Freeform explanation of a concept (or of a correct answer) against
    /// a prior summary.
    pub async fn explanation(
        &self,
        term: &str,
        summary: &str,
        quiz_context: bool,
    ) -> Result<String> {
        let request = self.builder.explanation(term, summary, quiz_context);
        let envelope = self.invoker.invoke(&request).await?;
        let payload = extract::extract_text(&envelope)?;
        Ok(payload.raw_text.trim().to_string())
    }

    /// Flashcards for a prior analysis.
    pub async fn flashcards(&self, analysis: &AnalysisResult) -> Result<Vec<Flashcard>> {
        let request = self.builder.flashcards(analysis);
        let envelope = self.invoker.invoke(&request).await?;
        let payload = extract::extract_json(&envelope)?;
        validate::flashcards(payload.json()?)
    }

    /// A sectioned study guide for a prior analysis.
    pub async fn study_guide(&self, analysis: &AnalysisResult) -> Result<StudyGuide> {
        let request = self.builder.study_guide(analysis);
        let envelope = self.invoker.invoke(&request).await?;
        let payload = extract::extract_json(&envelope)?;
        validate::study_guide(payload.json()?)
    }

    /// Qualitative performance feedback for a finished quiz. The counts
    /// and accuracy are computed here; the model never decides them.
    pub async fn performance(
        &self,
        analysis: &AnalysisResult,
        correct: u32,
    ) -> Result<PerformanceAnalysis> {
        let total = analysis.quiz.len() as u32;
        let correct = correct.min(total);
        let accuracy = PerformanceAnalysis::compute_accuracy(correct, total);

        let request = self.builder.performance(analysis, correct, total, accuracy);
        let envelope = self.invoker.invoke(&request).await?;
        let payload = extract::extract_json(&envelope)?;
        validate::performance(payload.json()?, correct, total)
    }

    /// Analyze a pasted document into topics, themes, and five questions.
    pub async fn document_analysis(
        &self,
        title: &str,
        document_text: &str,
    ) -> Result<DocumentAnalysis> {
        let request = self.builder.document_analysis(title, document_text);
        let envelope = self.invoker.invoke(&request).await?;
        let payload = extract::extract_json(&envelope)?;
        validate::document_analysis(
            payload.json()?,
            title,
            document_text.chars().count(),
            Utc::now(),
        )
    }

    /// Grade a student's free-text answer to a document question.
    pub async fn evaluate_response(
        &self,
        question: &DocumentQuestion,
        user_response: &str,
        document_context: &str,
        feedback: &ResponseFeedback,
    ) -> Result<ResponseEvaluation> {
        let request =
            self.builder.evaluate_response(question, user_response, document_context, feedback);
        let envelope = self.invoker.invoke(&request).await?;
        let payload = extract::extract_json(&envelope)?;
        validate::evaluation(payload.json()?)
    }

    /// Persona-driven content for a single request.
    pub async fn persona_content(
        &self,
        persona: &SystemPersona,
        request: &ContentRequest,
    ) -> Result<GeneratedContent> {
        let model_request = self.builder.persona_content(persona, request);
        let envelope = self.invoker.invoke(&model_request).await?;
        let payload = extract::extract_text(&envelope)?;

        let content = payload.raw_text.trim().to_string();
        Ok(GeneratedContent {
            token_estimate: GeneratedContent::estimate_tokens(&content),
            content,
            content_type: request.content_type,
            generated_at: Utc::now(),
            persona: persona.name.clone(),
        })
    }

    /// Up to `variant_count` distinct takes on the same content request,
    /// generated in one call and split out of the numbered list.
    pub async fn persona_variants(
        &self,
        persona: &SystemPersona,
        request: &ContentRequest,
        variant_count: usize,
    ) -> Result<Vec<GeneratedContent>> {
        let model_request = self.builder.persona_variants(persona, request, variant_count);
        let envelope = self.invoker.invoke(&model_request).await?;
        let payload = extract::extract_text(&envelope)?;

        let now = Utc::now();
        let variants = split_variants(&payload.raw_text, variant_count)
            .into_iter()
            .map(|content| GeneratedContent {
                token_estimate: GeneratedContent::estimate_tokens(&content),
                content,
                content_type: request.content_type,
                generated_at: now,
                persona: persona.name.clone(),
            })
            .collect();
        Ok(variants)
    }

    /// Synthesize speech and wrap the PCM payload as a playable WAVE file.
    pub async fn speech(&self, text: &str) -> Result<Vec<u8>> {
        let request = self.builder.speech(text);
        let envelope = self.invoker.invoke(&request).await?;
        let pcm = extract::inline_audio(&envelope)?;
        Ok(audio::pcm16_to_wav(&pcm, audio::SPEECH_SAMPLE_RATE))
    }
}

/// Split a numbered-list response into at most `max` non-empty variants.
fn split_variants(text: &str, max: usize) -> Vec<String> {
    VARIANT_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}
