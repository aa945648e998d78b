//! API route handlers
//!
//! This module contains all HTTP endpoint implementations for the chat
//! service. Routes are organized by functionality:
//!
//! - `health`: Health checks and metrics
//! - `chat`: Question answering

pub mod chat;
pub mod health;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info
///
/// Returns service information including version and available
/// endpoints. This is the root endpoint (GET /).
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "message": "RAG Chatbot API is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "A RAG-based chatbot using Azure OpenAI and Azure AI Search",
        "endpoints": {
            "chat": "POST /chat",
            "health": "GET /health",
            "metrics": "GET /metrics"
        }
    })))
}

/// 404 Not Found handler
///
/// Returns a standardized error response for undefined routes.
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
