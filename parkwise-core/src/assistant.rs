use async_trait::async_trait;
use parkwise_shared::ChatMessage;
use serde::{Deserialize, Serialize};

/// Text shown whenever the provider cannot produce an answer.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble connecting to my brain right now. Please try again later.";

/// A fully built provider call. Prompt construction happens before this point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub model: String,
    pub system_instruction: String,
    pub history: Vec<ChatMessage>,
    pub user_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssistantError {
    #[error("Assistant provider unavailable: {0}")]
    Unavailable(String),
    #[error("Assistant provider timed out after {0}s")]
    Timeout(u64),
    #[error("Assistant circuit is open")]
    CircuitOpen,
    #[error("Assistant is not configured")]
    NotConfigured,
    #[error("An assistant request is already in flight")]
    Busy,
}

/// Seam to the external text-generation provider
#[async_trait]
pub trait AssistantAdapter: Send + Sync {
    /// Provider name, used in logs
    fn name(&self) -> &str;

    /// Send one request and return the provider's free text
    async fn generate(&self, request: &AssistantRequest) -> Result<String, AssistantError>;
}

/// Adapter used when no credentials are configured; every call fails over
/// to the fallback reply.
pub struct DisabledAssistant;

#[async_trait]
impl AssistantAdapter for DisabledAssistant {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _request: &AssistantRequest) -> Result<String, AssistantError> {
        tracing::debug!("Assistant called without credentials");
        Err(AssistantError::NotConfigured)
    }
}
