//! Persona-driven content generation types.
//!
//! A [`SystemPersona`] is constructed once per content-generation session
//! and rendered into a system instruction so every request in the session
//! keeps the same voice. Presets cover the common cases; custom personas
//! are just struct literals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Persona
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPersona {
    pub name: String,
    pub role: String,
    pub expertise: Vec<String>,
    pub tone: Tone,
    /// Writing style description.
    pub style: String,
    /// Core values the persona adheres to.
    pub values: Vec<String>,
    /// What the persona should avoid.
    pub constraints: Vec<String>,
    /// Example outputs to match style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Casual,
    Educational,
    Creative,
    Technical,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Educational => "educational",
            Tone::Creative => "creative",
            Tone::Technical => "technical",
        }
    }
}

impl SystemPersona {
    /// Render the persona into the system instruction used for every
    /// request in a content-generation session.
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are {}, {}.\n\nEXPERTISE: {}\n\nTONE: Communicate in a {} tone.\n\nSTYLE: {}\n\nCORE VALUES: {}\n\nCONSTRAINTS:\n{}",
            self.name,
            self.role,
            self.expertise.join(", "),
            self.tone.as_str(),
            self.style,
            self.values.join(", "),
            self.constraints
                .iter()
                .map(|c| format!("- {c}"))
                .collect::<Vec<_>>()
                .join("\n"),
        );

        if let Some(ref examples) = self.examples {
            prompt.push_str("\n\nSTYLE EXAMPLES:\n");
            prompt.push_str(
                &examples.iter().map(|e| format!("- {e}")).collect::<Vec<_>>().join("\n"),
            );
        }

        prompt.push_str(
            "\n\nYou must maintain consistency with this persona in ALL responses. \
             Generate high-quality, polished content on the first attempt to \
             minimize revisions.",
        );
        prompt
    }

    // ── Presets ────────────────────────────────────────────────────

    pub fn technical_writer() -> Self {
        Self {
            name: "TechWriter".into(),
            role: "Technical Documentation Specialist".into(),
            expertise: vec![
                "API documentation".into(),
                "system architecture".into(),
                "code explanation".into(),
                "troubleshooting".into(),
            ],
            tone: Tone::Technical,
            style: "Clear, concise, precise. Use active voice. Include practical \
                    examples. Structure with headers and bullets."
                .into(),
            values: vec![
                "Accuracy".into(),
                "Clarity".into(),
                "Completeness".into(),
                "Accessibility to beginners".into(),
            ],
            constraints: vec![
                "No marketing language".into(),
                "No assumptions about prior knowledge".into(),
                "No verbose explanations".into(),
            ],
            examples: None,
        }
    }

    pub fn marketing_copywriter() -> Self {
        Self {
            name: "MarketingPro".into(),
            role: "Creative Marketing Copywriter".into(),
            expertise: vec![
                "persuasive writing".into(),
                "brand voice".into(),
                "emotional engagement".into(),
                "conversion optimization".into(),
            ],
            tone: Tone::Creative,
            style: "Compelling, engaging, benefit-focused. Use power words. Tell \
                    stories. Create urgency. Speak directly to the reader."
                .into(),
            values: vec![
                "Impact".into(),
                "Authenticity".into(),
                "Customer-centricity".into(),
                "Creativity".into(),
            ],
            constraints: vec![
                "No false claims".into(),
                "No spam language".into(),
                "Maintain brand consistency".into(),
            ],
            examples: None,
        }
    }

    pub fn educational_tutor() -> Self {
        Self {
            name: "TutorBot".into(),
            role: "Patient Educational Content Creator".into(),
            expertise: vec![
                "pedagogy".into(),
                "concept explanation".into(),
                "learning progression".into(),
            ],
            tone: Tone::Educational,
            style: "Supportive, encouraging, building from simple to complex. Use \
                    analogies. Break concepts into digestible pieces."
                .into(),
            values: vec![
                "Understanding".into(),
                "Patience".into(),
                "Empowerment".into(),
                "Inclusivity".into(),
            ],
            constraints: vec![
                "No condescension".into(),
                "No skipping explanatory steps".into(),
                "Encourage curiosity".into(),
            ],
            examples: None,
        }
    }

    pub fn code_architect() -> Self {
        Self {
            name: "CodeArchitect".into(),
            role: "Software Architecture Expert".into(),
            expertise: vec![
                "design patterns".into(),
                "scalability".into(),
                "clean code".into(),
                "best practices".into(),
            ],
            tone: Tone::Professional,
            style: "Pragmatic, DRY principles. Code examples are production-ready. \
                    Explain trade-offs and considerations."
                .into(),
            values: vec![
                "Quality".into(),
                "Maintainability".into(),
                "Performance".into(),
                "Simplicity".into(),
            ],
            constraints: vec![
                "No quick-and-dirty solutions".into(),
                "Always explain architecture decisions".into(),
                "Consider edge cases".into(),
            ],
            examples: None,
        }
    }

    /// Look up a preset by its CLI-facing name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "technical-writer" => Some(Self::technical_writer()),
            "marketing-copywriter" => Some(Self::marketing_copywriter()),
            "educational-tutor" => Some(Self::educational_tutor()),
            "code-architect" => Some(Self::code_architect()),
            _ => None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Content requests & results
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    CodeSnippet,
    MarketingCopy,
    TechnicalDoc,
    CreativeWriting,
    Explanation,
    Custom,
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "code-snippet" => Ok(ContentType::CodeSnippet),
            "marketing-copy" => Ok(ContentType::MarketingCopy),
            "technical-doc" => Ok(ContentType::TechnicalDoc),
            "creative-writing" => Ok(ContentType::CreativeWriting),
            "explanation" => Ok(ContentType::Explanation),
            "custom" => Ok(ContentType::Custom),
            other => Err(format!("unknown content type '{other}'")),
        }
    }
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::CodeSnippet => "code-snippet",
            ContentType::MarketingCopy => "marketing-copy",
            ContentType::TechnicalDoc => "technical-doc",
            ContentType::CreativeWriting => "creative-writing",
            ContentType::Explanation => "explanation",
            ContentType::Custom => "custom",
        }
    }
}

/// One content-generation request made against a persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    pub content_type: ContentType,
    pub topic: String,
    pub target_audience: String,
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    /// Additional context for this specific request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_context: Option<String>,
}

/// Generated content plus light provenance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub content: String,
    pub content_type: ContentType,
    pub generated_at: DateTime<Utc>,
    /// Rough estimate at ~4 characters per token.
    pub token_estimate: usize,
    /// Name of the persona that produced the content.
    pub persona: String,
}

impl GeneratedContent {
    pub fn estimate_tokens(text: &str) -> usize {
        text.len().div_ceil(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_identity_and_constraints() {
        let persona = SystemPersona::technical_writer();
        let prompt = persona.system_prompt();

        assert!(prompt.contains("You are TechWriter, Technical Documentation Specialist."));
        assert!(prompt.contains("TONE: Communicate in a technical tone."));
        for value in &persona.values {
            assert!(prompt.contains(value.as_str()));
        }
        for constraint in &persona.constraints {
            assert!(prompt.contains(&format!("- {constraint}")));
        }
        // No examples configured, so the section is absent.
        assert!(!prompt.contains("STYLE EXAMPLES"));
    }

    #[test]
    fn system_prompt_lists_examples_when_present() {
        let mut persona = SystemPersona::educational_tutor();
        persona.examples = Some(vec!["Think of it like a recipe.".into()]);
        let prompt = persona.system_prompt();
        assert!(prompt.contains("STYLE EXAMPLES:\n- Think of it like a recipe."));
    }

    #[test]
    fn preset_lookup_by_cli_name() {
        assert!(SystemPersona::preset("code-architect").is_some());
        assert!(SystemPersona::preset("unknown").is_none());
    }

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(GeneratedContent::estimate_tokens(""), 0);
        assert_eq!(GeneratedContent::estimate_tokens("abcd"), 1);
        assert_eq!(GeneratedContent::estimate_tokens("abcde"), 2);
    }
}
