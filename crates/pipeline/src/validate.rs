//! Domain validation and shape repair.
//!
//! One function per target shape. Optional fields default; structural
//! fields are enforced. The repair rules here are defaulting, not error
//! suppression — a payload that cannot be repaired fails with a
//! `Validation` error, and that failure is terminal for the request.

use chrono::{DateTime, Utc};
use lumina_domain::document::{DocumentAnalysis, DocumentQuestion, QuestionDifficulty};
use lumina_domain::error::{Error, Result, ValidationKind};
use lumina_domain::study::{
    AnalysisResult, Flashcard, GuideSection, PerformanceAnalysis, QuizItem, ResponseEvaluation,
    StudyGuide,
};
use serde_json::Value;

/// Placeholder options used to pad short quiz items.
const PLACEHOLDER_OPTIONS: [&str; 4] = ["A", "B", "C", "D"];

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Quiz analysis
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Validate an analysis payload. `quiz` must be a non-empty array; each
/// item is repaired to exactly four options with a member answer.
pub fn analysis(payload: &Value) -> Result<AnalysisResult> {
    let quiz_items = payload
        .get("quiz")
        .and_then(|q| q.as_array())
        .filter(|a| !a.is_empty())
        .ok_or_else(|| {
            Error::validation(
                ValidationKind::InvalidQuizShape,
                "quiz is missing, not an array, or empty",
            )
        })?;

    Ok(AnalysisResult {
        summary: str_field(payload, "summary"),
        key_concepts: str_seq(payload, "key_concepts"),
        analogy: str_field(payload, "analogy"),
        quiz: quiz_items.iter().map(repair_quiz_item).collect(),
    })
}

/// Repair one quiz item: options truncated/padded to exactly four, answer
/// forced to be a member (defaulting to the first option).
fn repair_quiz_item(item: &Value) -> QuizItem {
    let question = str_field(item, "question");

    let mut options: Vec<String> = item
        .get("options")
        .and_then(|o| o.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default();
    options.truncate(4);
    while options.len() < 4 {
        options.push(PLACEHOLDER_OPTIONS[options.len()].to_string());
    }

    let answer = item
        .get("answer")
        .and_then(|a| a.as_str())
        .filter(|a| options.iter().any(|o| o == a))
        .map(str::to_string)
        .unwrap_or_else(|| options[0].clone());

    QuizItem { question, options, answer }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Document analysis
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Validate a document-analysis payload. `questions` must be an array and
/// is capped at the first five; `title`, `length`, and the timestamp come
/// from the caller, never the model.
pub fn document_analysis(
    payload: &Value,
    title: &str,
    document_length: usize,
    generated_at: DateTime<Utc>,
) -> Result<DocumentAnalysis> {
    let question_items = payload
        .get("questions")
        .and_then(|q| q.as_array())
        .ok_or_else(|| {
            Error::validation(
                ValidationKind::InvalidQuestionShape,
                "questions is missing or not an array",
            )
        })?;

    let questions = question_items.iter().take(5).map(document_question).collect();

    Ok(DocumentAnalysis {
        title: title.to_string(),
        length: document_length,
        summary: str_field(payload, "summary"),
        key_topics: str_seq(payload, "key_topics"),
        main_themes: str_seq(payload, "main_themes"),
        questions,
        generated_at,
    })
}

fn document_question(item: &Value) -> DocumentQuestion {
    let difficulty = item
        .get("difficulty")
        .and_then(|d| d.as_str())
        .map(QuestionDifficulty::parse_lenient)
        .unwrap_or_default();

    DocumentQuestion {
        id: str_field(item, "id"),
        question: str_field(item, "question"),
        difficulty,
        topic: str_field(item, "topic"),
        context: str_field(item, "context"),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Flashcards, study guide, performance, evaluation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Validate a flashcard payload; a missing `flashcards` array yields an
/// empty set.
pub fn flashcards(payload: &Value) -> Result<Vec<Flashcard>> {
    let cards = payload
        .get("flashcards")
        .and_then(|f| f.as_array())
        .map(|a| {
            a.iter()
                .map(|c| Flashcard {
                    term: str_field(c, "term"),
                    definition: str_field(c, "definition"),
                    example: c
                        .get("example")
                        .and_then(|e| e.as_str())
                        .filter(|e| !e.is_empty())
                        .map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(cards)
}

/// Validate a study-guide payload; missing arrays and scalars default.
pub fn study_guide(payload: &Value) -> Result<StudyGuide> {
    let sections = payload
        .get("sections")
        .and_then(|s| s.as_array())
        .map(|a| {
            a.iter()
                .map(|s| GuideSection {
                    heading: str_field(s, "heading"),
                    content: str_field(s, "content"),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(StudyGuide {
        title: str_field(payload, "title"),
        sections,
        key_takeaways: str_seq(payload, "keyTakeaways"),
    })
}

/// Validate a performance payload. `accuracy` is recomputed locally from
/// the caller-supplied counts; the model only contributes the lists.
pub fn performance(payload: &Value, correct: u32, total: u32) -> Result<PerformanceAnalysis> {
    let correct = correct.min(total);

    Ok(PerformanceAnalysis {
        total_questions: total,
        correct_answers: correct,
        accuracy: PerformanceAnalysis::compute_accuracy(correct, total),
        strengths: str_seq(payload, "strengths"),
        growth_areas: str_seq(payload, "growthAreas"),
        recommendations: str_seq(payload, "recommendations"),
    })
}

/// Validate an evaluation payload; the score is clamped to `[0, 100]`.
pub fn evaluation(payload: &Value) -> Result<ResponseEvaluation> {
    let score = payload.get("score").and_then(|s| s.as_u64()).unwrap_or(0).min(100) as u32;

    Ok(ResponseEvaluation {
        evaluation: str_field(payload, "evaluation"),
        score,
        suggestions: str_seq(payload, "suggestions"),
    })
}

// ── Internal helpers ───────────────────────────────────────────────

fn str_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(|v| v.as_str()).unwrap_or("").to_string()
}

fn str_seq(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}
