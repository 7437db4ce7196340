//! `lumina analyze` — turn an image or a YouTube video into a quiz.

use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use lumina_domain::config::Config;
use lumina_domain::study::QuizDifficulty;
use lumina_pipeline::SourceMaterial;

use crate::youtube;

pub async fn run(
    config: &Config,
    image: Option<PathBuf>,
    youtube_url: Option<String>,
    questions: u32,
    difficulty: QuizDifficulty,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let source = match (image, youtube_url) {
        (Some(path), None) => {
            let bytes =
                std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            SourceMaterial::image(guess_mime(&path), BASE64.encode(bytes))
        }
        (None, Some(url)) => {
            let id = youtube::video_id(&url)
                .with_context(|| format!("not a recognizable YouTube URL: {url}"))?;
            SourceMaterial::VideoId(id)
        }
        _ => anyhow::bail!("provide exactly one of --image or --youtube"),
    };

    let pipeline = super::pipeline(config)?;
    let analysis = pipeline.analyze(&source, questions, difficulty).await?;
    super::emit(&analysis, out.as_deref())
}

fn guess_mime(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}
