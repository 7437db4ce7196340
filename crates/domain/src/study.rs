use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Analysis result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Analysis of a piece of source material: summary, concepts, an analogy,
/// and a multiple-choice quiz. Produced by validation, never deserialized
/// straight from model output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub key_concepts: Vec<String>,
    pub analogy: String,
    pub quiz: Vec<QuizItem>,
}

/// One multiple-choice question. Validation guarantees exactly four
/// options and that `answer` is one of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// Requested quiz difficulty relative to the previous round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizDifficulty {
    Easier,
    #[default]
    Same,
    Harder,
}

impl QuizDifficulty {
    /// The word interpolated into the generation prompt.
    pub fn prompt_word(self) -> &'static str {
        match self {
            QuizDifficulty::Easier => "easier",
            QuizDifficulty::Harder => "harder",
            QuizDifficulty::Same => "medium",
        }
    }
}

impl std::str::FromStr for QuizDifficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "easier" => Ok(QuizDifficulty::Easier),
            "same" => Ok(QuizDifficulty::Same),
            "harder" => Ok(QuizDifficulty::Harder),
            other => Err(format!("unknown difficulty '{other}' (easier|same|harder)")),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Flashcards
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Study guide
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyGuide {
    pub title: String,
    pub sections: Vec<GuideSection>,
    pub key_takeaways: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideSection {
    pub heading: String,
    pub content: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Performance
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Quiz performance report. `accuracy` is always recomputed locally from
/// `correct_answers / total_questions`; the model only contributes the
/// qualitative feedback lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    pub total_questions: u32,
    pub correct_answers: u32,
    /// Whole percent in `[0, 100]`.
    pub accuracy: u32,
    pub strengths: Vec<String>,
    pub growth_areas: Vec<String>,
    pub recommendations: Vec<String>,
}

impl PerformanceAnalysis {
    /// `round(100 * correct / total)`, or 0 when there were no questions.
    pub fn compute_accuracy(correct: u32, total: u32) -> u32 {
        if total == 0 {
            0
        } else {
            ((correct as f64 / total as f64) * 100.0).round() as u32
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response evaluation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A graded free-text answer to a document question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEvaluation {
    pub evaluation: String,
    /// 0–100.
    pub score: u32,
    pub suggestions: Vec<String>,
}
