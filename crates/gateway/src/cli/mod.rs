pub mod analyze;
pub mod content;
pub mod document;
pub mod quiz;
pub mod speak;
pub mod study;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use lumina_domain::config::Config;
use lumina_domain::persona::ContentType;
use lumina_domain::study::{AnalysisResult, QuizDifficulty};
use lumina_pipeline::{HttpRelayTransport, StudyPipeline};

/// Lumina — an AI study-aid pipeline.
#[derive(Debug, Parser)]
#[command(name = "lumina", version, about)]
pub struct Cli {
    /// Path to the config file.
    #[arg(long, global = true, default_value = "lumina.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the relay server.
    Serve,
    /// Analyze an image or a YouTube video into a summary and quiz.
    Analyze {
        /// Path to an image (notes, diagrams, screenshots).
        #[arg(long)]
        image: Option<PathBuf>,
        /// A YouTube URL (watch, short-link, or embed form).
        #[arg(long)]
        youtube: Option<String>,
        /// How many quiz questions to request.
        #[arg(long, default_value_t = 10)]
        questions: u32,
        /// Quiz difficulty relative to the last round.
        #[arg(long, default_value = "same")]
        difficulty: QuizDifficulty,
        /// Write the analysis JSON here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Analyze a text document into topics, themes, and five questions.
    Document {
        /// Path to a plain-text document.
        file: PathBuf,
        /// Document title (defaults to the file stem).
        #[arg(long)]
        title: Option<String>,
        /// Write the analysis JSON here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate flashcards from a saved analysis.
    Flashcards {
        /// Analysis JSON produced by `lumina analyze --out`.
        analysis: PathBuf,
    },
    /// Generate a study guide from a saved analysis.
    Guide {
        /// Analysis JSON produced by `lumina analyze --out`.
        analysis: PathBuf,
    },
    /// Take the quiz interactively, with spaced-repetition scheduling and
    /// a performance report at the end.
    Quiz {
        /// Analysis JSON produced by `lumina analyze --out`.
        analysis: PathBuf,
    },
    /// Synthesize speech for a piece of text and write a WAVE file.
    Speak {
        /// Text to read aloud.
        text: String,
        /// Output path.
        #[arg(long, default_value = "speech.wav")]
        out: PathBuf,
    },
    /// Generate persona-driven content.
    Content {
        /// Preset persona: technical-writer, marketing-copywriter,
        /// educational-tutor, or code-architect.
        #[arg(long, default_value = "technical-writer")]
        persona: String,
        /// What to write about.
        #[arg(long)]
        topic: String,
        /// Who it is for.
        #[arg(long, default_value = "a general audience")]
        audience: String,
        /// Content type.
        #[arg(long, default_value = "explanation")]
        kind: ContentType,
        /// Requirement lines (repeatable).
        #[arg(long = "require")]
        requirements: Vec<String>,
        /// Generate this many distinct variants in one call.
        #[arg(long)]
        variants: Option<usize>,
    },
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &str) -> anyhow::Result<Config> {
    match std::fs::read_to_string(path) {
        Ok(text) => toml::from_str(&text).with_context(|| format!("parsing {path}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path, "no config file, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).with_context(|| format!("reading {path}")),
    }
}

/// Build the production pipeline from config.
pub fn pipeline(config: &Config) -> anyhow::Result<StudyPipeline<HttpRelayTransport>> {
    Ok(StudyPipeline::new(&config.pipeline)?)
}

/// Read a saved analysis produced by `lumina analyze --out`.
pub fn read_analysis(path: &Path) -> anyhow::Result<AnalysisResult> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading analysis {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing analysis {}", path.display()))
}

/// Print a value as pretty JSON, or write it to a file when `out` is set.
pub fn emit<T: serde::Serialize>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            eprintln!("written to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
