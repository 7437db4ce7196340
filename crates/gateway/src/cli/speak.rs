//! `lumina speak` — speech synthesis to a WAVE file.

use std::path::PathBuf;

use anyhow::Context;

use lumina_domain::config::Config;

pub async fn run(config: &Config, text: String, out: PathBuf) -> anyhow::Result<()> {
    let pipeline = super::pipeline(config)?;
    let wav = pipeline.speech(&text).await?;

    std::fs::write(&out, &wav).with_context(|| format!("writing {}", out.display()))?;
    eprintln!("{} bytes written to {}", wav.len(), out.display());
    Ok(())
}
