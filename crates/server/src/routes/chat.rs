use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to answer a question
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Question text. Must contain at least one non-whitespace character.
    pub question: String,
}

/// Response carrying the generated answer
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Answer a question over the indexed documents.
///
/// Validates the question, then runs the answering chain: embed the
/// question, retrieve the nearest chunks, ask the chat model. Upstream
/// failures are logged in full and reported to the client as a generic
/// 500; validation failures return 400 before any upstream call is made.
pub async fn ask_question(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ChatRequest>,
) -> ServerResult<Json<ChatResponse>> {
    let question = request.question.trim();
    if question.is_empty() {
        metrics::counter!("chat_requests_total", "outcome" => "bad_request").increment(1);
        return Err(ServerError::BadRequest(
            "Question cannot be empty".to_string(),
        ));
    }

    let preview: String = question.chars().take(100).collect();
    tracing::info!(question = %preview, "processing question");

    match state.chain.answer(question).await {
        Ok(answer) => {
            metrics::counter!("chat_requests_total", "outcome" => "ok").increment(1);
            Ok(Json(ChatResponse { answer }))
        }
        Err(err) => {
            metrics::counter!("chat_requests_total", "outcome" => "error").increment(1);
            Err(ServerError::Chat(err))
        }
    }
}
