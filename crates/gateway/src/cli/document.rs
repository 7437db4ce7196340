//! `lumina document` — document Q&A analysis.

use std::path::PathBuf;

use anyhow::Context;

use lumina_domain::config::Config;

pub async fn run(
    config: &Config,
    file: PathBuf,
    title: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let text =
        std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
    let title = title.unwrap_or_else(|| {
        file.file_stem().and_then(|s| s.to_str()).unwrap_or("Untitled").to_string()
    });

    let pipeline = super::pipeline(config)?;
    let analysis = pipeline.document_analysis(&title, &text).await?;
    super::emit(&analysis, out.as_deref())
}
