//! `lumina flashcards` / `lumina guide` — follow-up study material
//! generated from a saved analysis.

use std::path::PathBuf;

use lumina_domain::config::Config;

pub async fn flashcards(config: &Config, analysis_path: PathBuf) -> anyhow::Result<()> {
    let analysis = super::read_analysis(&analysis_path)?;
    let pipeline = super::pipeline(config)?;
    let cards = pipeline.flashcards(&analysis).await?;

    if cards.is_empty() {
        eprintln!("the model returned no flashcards; try again");
        return Ok(());
    }
    super::emit(&cards, None)
}

pub async fn guide(config: &Config, analysis_path: PathBuf) -> anyhow::Result<()> {
    let analysis = super::read_analysis(&analysis_path)?;
    let pipeline = super::pipeline(config)?;
    let guide = pipeline.study_guide(&analysis).await?;
    super::emit(&guide, None)
}
