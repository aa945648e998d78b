//! Partition a document into chunk records.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use docrag::{partition_document, ChunkingConfig, PartitionClient, PartitionConfig};

#[derive(Parser, Debug)]
#[command(
    name = "partition",
    about = "Partition a document into chunk records for indexing"
)]
struct PartitionCli {
    /// Document to partition (PDF)
    input: PathBuf,

    /// Output records file
    #[arg(long, default_value = "data.json")]
    output: PathBuf,

    /// Partition service URL
    #[arg(long, env = "PARTITION_API_URL")]
    partition_url: Option<String>,

    /// Partition service API key
    #[arg(long, env = "PARTITION_API_KEY")]
    api_key: Option<String>,

    /// Hard maximum characters per chunk
    #[arg(long, default_value_t = 1000)]
    max_characters: usize,

    /// Start a new chunk once the current one has grown past this
    #[arg(long, default_value_t = 800)]
    new_after_n_chars: usize,

    /// Merge chunks shorter than this into their successor
    #[arg(long, default_value_t = 500)]
    combine_text_under_n_chars: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Env file is optional; deployed environments set real variables
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = PartitionCli::parse();

    let mut partition_config = PartitionConfig::default();
    if let Some(url) = cli.partition_url {
        partition_config = partition_config.with_api_url(url);
    }
    if let Some(key) = cli.api_key {
        partition_config = partition_config.with_api_key(key);
    }
    let client = PartitionClient::new(partition_config)?;

    let chunking = ChunkingConfig::default()
        .with_max_characters(cli.max_characters)
        .with_new_after_n_chars(cli.new_after_n_chars)
        .with_combine_text_under_n_chars(cli.combine_text_under_n_chars);

    let summary = partition_document(&client, &cli.input, &cli.output, &chunking)
        .await
        .with_context(|| format!("failed to partition {}", cli.input.display()))?;

    println!(
        "{} elements ({} page breaks removed) -> {} chunks written to {}",
        summary.elements,
        summary.page_breaks_removed,
        summary.chunks,
        cli.output.display()
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
