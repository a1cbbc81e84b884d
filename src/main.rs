use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use lab_generator::{LabGenerator, Technology};

#[derive(Parser)]
#[command(name = "lab-generator")]
#[command(about = "Generate a hands-on DevOps lab from a trending topic with Gemini", long_about = None)]
struct Cli {
    /// Topic title the lab should be inspired by
    #[arg(long)]
    title: String,

    /// Short summary of the topic
    #[arg(long)]
    summary: String,

    /// docker, kubernetes, helm, argocd, ansible, aws or terraform (random when omitted)
    #[arg(short, long)]
    technology: Option<Technology>,

    /// Slug of an existing lab to avoid duplicating (repeatable)
    #[arg(long = "existing")]
    existing: Vec<String>,

    /// File with one existing lab slug per line
    #[arg(long)]
    existing_file: Option<PathBuf>,

    /// Ask the model for a second opinion on the difficulty
    #[arg(long, default_value_t = false)]
    reassess: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let generator = LabGenerator::from_env()?;

    let mut existing = Vec::new();
    if let Some(path) = &cli.existing_file {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        existing.extend(contents.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from));
    }
    existing.extend(cli.existing);

    let mut lab = generator
        .generate(&cli.title, &cli.summary, cli.technology, &existing)
        .await?;

    if cli.reassess {
        let difficulty = generator.reassess_difficulty(&lab).await?;
        lab = lab.with_difficulty(difficulty);
    }

    println!("{}", serde_json::to_string_pretty(&lab)?);
    Ok(())
}
