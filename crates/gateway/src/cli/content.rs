//! `lumina content` — persona-driven content generation.

use anyhow::Context;

use lumina_domain::config::Config;
use lumina_domain::persona::{ContentRequest, ContentType, SystemPersona};

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: &Config,
    persona_name: String,
    topic: String,
    audience: String,
    kind: ContentType,
    requirements: Vec<String>,
    variants: Option<usize>,
) -> anyhow::Result<()> {
    let persona = SystemPersona::preset(&persona_name)
        .with_context(|| format!("unknown persona preset '{persona_name}'"))?;

    let request = ContentRequest {
        content_type: kind,
        topic,
        target_audience: audience,
        requirements,
        constraints: None,
        output_format: None,
        custom_context: None,
    };

    let pipeline = super::pipeline(config)?;

    match variants {
        Some(count) => {
            let variants = pipeline.persona_variants(&persona, &request, count).await?;
            for (idx, variant) in variants.iter().enumerate() {
                println!("━━━ variant {} (~{} tokens) ━━━", idx + 1, variant.token_estimate);
                println!("{}\n", variant.content);
            }
        }
        None => {
            let content = pipeline.persona_content(&persona, &request).await?;
            eprintln!("[{} | ~{} tokens]", content.persona, content.token_estimate);
            println!("{}", content.content);
        }
    }
    Ok(())
}
