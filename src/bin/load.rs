//! Embed chunk records and upload them to the vector index.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use docrag::{
    load_records, AzureEmbeddingsClient, AzureSearchClient, EmbeddingsConfig, SearchConfig,
    UploadPolicy,
};

#[derive(Parser, Debug)]
#[command(
    name = "load",
    about = "Embed chunk records and upload them to the vector index"
)]
struct LoadCli {
    /// Records file produced by the partition step
    #[arg(long, default_value = "data.json")]
    input: PathBuf,

    /// What to do with records that fail to embed
    #[arg(long, value_enum, default_value = "fail-run")]
    policy: UploadPolicy,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Env file is optional; deployed environments set real variables
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = LoadCli::parse();

    let embedder = AzureEmbeddingsClient::new(
        EmbeddingsConfig::from_env().context("embedding settings")?,
    )?;
    let index =
        AzureSearchClient::new(SearchConfig::from_env().context("search settings")?)?;

    let summary = load_records(&embedder, &index, &cli.input, cli.policy)
        .await
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    println!(
        "{} records: {} embedded, {} skipped, {} uploaded",
        summary.total, summary.embedded, summary.skipped, summary.uploaded
    );
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();
}
