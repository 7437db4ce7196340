use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Document analysis
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Analysis of a pasted text document: summary, topics, themes, and up to
/// five complex questions. `title`, `length`, and `generated_at` come from
/// the caller, not the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub title: String,
    /// Character count of the full (untruncated) document.
    pub length: usize,
    pub summary: String,
    pub key_topics: Vec<String>,
    pub main_themes: Vec<String>,
    pub questions: Vec<DocumentQuestion>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentQuestion {
    pub id: String,
    pub question: String,
    pub difficulty: QuestionDifficulty,
    pub topic: String,
    /// The document excerpt the question is grounded in.
    pub context: String,
}

/// Absolute difficulty tier of a document question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionDifficulty {
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl QuestionDifficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionDifficulty::Intermediate => "intermediate",
            QuestionDifficulty::Advanced => "advanced",
            QuestionDifficulty::Expert => "expert",
        }
    }

    /// Lenient parse used during validation; unknown tiers fall back to
    /// intermediate.
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "advanced" => QuestionDifficulty::Advanced,
            "expert" => QuestionDifficulty::Expert,
            _ => QuestionDifficulty::Intermediate,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Student feedback
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The student's self-reported feedback attached to an answer, passed to
/// the evaluation prompt verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFeedback {
    /// 1 = unclear, 5 = very clear.
    pub clarity: u8,
    /// 1 = too easy, 5 = too hard.
    pub difficulty: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for ResponseFeedback {
    fn default() -> Self {
        Self { clarity: 3, difficulty: 3, notes: None }
    }
}
