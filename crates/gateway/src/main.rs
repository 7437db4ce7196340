use clap::Parser;
use tracing_subscriber::EnvFilter;

use lumina_gateway::cli::{self, Cli, Command};
use lumina_gateway::relay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli::load_config(&cli.config)?;

    match cli.command {
        Command::Serve => relay::serve(config.relay).await,
        Command::Analyze { image, youtube, questions, difficulty, out } => {
            cli::analyze::run(&config, image, youtube, questions, difficulty, out).await
        }
        Command::Document { file, title, out } => {
            cli::document::run(&config, file, title, out).await
        }
        Command::Flashcards { analysis } => cli::study::flashcards(&config, analysis).await,
        Command::Guide { analysis } => cli::study::guide(&config, analysis).await,
        Command::Quiz { analysis } => cli::quiz::run(&config, analysis).await,
        Command::Speak { text, out } => cli::speak::run(&config, text, out).await,
        Command::Content { persona, topic, audience, kind, requirements, variants } => {
            cli::content::run(&config, persona, topic, audience, kind, requirements, variants)
                .await
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
