pub mod bridge;
pub mod chat;
pub mod gemini;
pub mod prompt;
pub mod resiliency;

pub use bridge::{AssistantBridge, AssistantContext, AssistantReply};
pub use chat::ChatLog;
pub use gemini::GeminiAdapter;
pub use resiliency::{CircuitBreaker, CircuitState};
