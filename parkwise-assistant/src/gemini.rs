use async_trait::async_trait;
use parkwise_core::assistant::{AssistantAdapter, AssistantError, AssistantRequest};
use parkwise_shared::{ChatMessage, MessageSender};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Older turns are dropped before sending
const MAX_HISTORY_MESSAGES: usize = 20;

/// Client for the Generative Language `generateContent` endpoint
pub struct GeminiAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeminiAdapter {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

fn text_content(role: Option<&str>, text: &str) -> Content {
    Content {
        role: role.map(str::to_string),
        parts: vec![Part { text: text.to_string() }],
    }
}

fn build_body(request: &AssistantRequest) -> GenerateContentRequest {
    let start = request.history.len().saturating_sub(MAX_HISTORY_MESSAGES);
    let history: Vec<&ChatMessage> = request.history[start..]
        .iter()
        // The conversation must open with a user turn
        .skip_while(|m| m.sender != MessageSender::User)
        .collect();

    let mut contents: Vec<Content> = history
        .into_iter()
        .map(|m| {
            let role = match m.sender {
                MessageSender::User => "user",
                MessageSender::Assistant => "model",
            };
            text_content(Some(role), &m.text)
        })
        .collect();
    contents.push(text_content(Some("user"), &request.user_text));

    GenerateContentRequest {
        system_instruction: text_content(None, &request.system_instruction),
        contents,
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, AssistantError> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .map(|c| {
            c.content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AssistantError::Unavailable("empty response".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl AssistantAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &AssistantRequest) -> Result<String, AssistantError> {
        let body = build_body(request);
        debug!("Sending {} turn(s) to {}", body.contents.len(), request.model);

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Unavailable(format!("provider returned {}", status)));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::Unavailable(e.to_string()))?;

        extract_text(parsed)
    }
}
