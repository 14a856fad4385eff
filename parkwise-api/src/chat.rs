use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};
use chrono::Utc;
use parkwise_assistant::AssistantContext;
use parkwise_shared::{ChatMessage, MessageSender};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub user: ChatMessage,
    pub reply: ChatMessage,
    pub fallback: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/chat", get(transcript).post(send_message))
}

async fn transcript(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.chat.read().await.messages().to_vec())
}

async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::ValidationError("Message text is empty".to_string()));
    }

    let history = state.chat.read().await.messages().to_vec();
    let now = Utc::now();
    let snapshot = state.lot.snapshot(now).await;
    let context = AssistantContext {
        occupancy: snapshot.occupancy,
        booking: snapshot.booking,
        tariff: state.lot.tariff().await,
        now,
    };

    // No lot or chat lock is held while the provider is called
    let reply = state.assistant.respond(text, &history, &context).await?;

    let mut chat = state.chat.write().await;
    let user = chat.push(MessageSender::User, text);
    let answer = chat.push(MessageSender::Assistant, reply.text);

    Ok(Json(SendMessageResponse {
        user,
        reply: answer,
        fallback: reply.fallback,
    }))
}
