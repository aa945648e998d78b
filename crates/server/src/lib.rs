//! HTTP chat service over an indexed document corpus.
//!
//! This crate exposes the answering chain behind a small REST API:
//!
//! - **Question Answering**: `POST /chat` embeds the question, retrieves
//!   the nearest chunks from the vector index, and returns the model's
//!   grounded answer
//! - **Health & Metrics**: liveness probe and Prometheus-compatible
//!   metrics
//!
//! # Features
//!
//! - **Middleware**: Compression, CORS, request ID tracking, structured
//!   logging, request timeouts, body size limits
//! - **Configuration**: Environment variable and file-based
//!   configuration, validated before the server binds
//! - **Error Handling**: Error responses with stable codes; upstream
//!   provider failures are logged in full but reported to clients as a
//!   single generic message
//! - **Graceful Shutdown**: Proper signal handling for production
//!   deployments
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /metrics` - Prometheus metrics
//! - `POST /chat` - Answer a question

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult, GENERIC_CHAT_ERROR};
pub use server::{build_router, start_server};
pub use state::ServerState;
