//! HTTP chat service over an indexed document corpus.
//!
//! Answers questions by embedding them, retrieving the nearest document
//! chunks from the vector index, and asking the chat model.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Env file is optional; deployed environments set real variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = ServerConfig::load()?;

    // Start server
    server::start_server(config).await?;

    Ok(())
}
