use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use crate::error::{QuizError, Result};

/// Everything needed for one chat-completion round trip.
#[derive(Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub api_url: &'a str,
    pub model: &'a str,
    pub api_key: &'a str,
    pub prompt: &'a str,
}

/// Sends a single-message prompt and returns the model's raw text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// OpenAI-compatible `/chat/completions` client.
#[derive(Clone, Default)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CompletionBackend for ChatCompletionsClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        let body = ChatRequest {
            model: request.model,
            messages: [ChatMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        let response = self
            .client
            .post(request.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", request.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, text));
        }

        let response = response.json::<serde_json::Value>().await?;
        log::info!("completion received from {}", request.model);
        message_content(&response)
    }
}

/// Maps a non-success status to the matching error kind.
pub fn classify_status(status: StatusCode, body: String) -> QuizError {
    match status {
        StatusCode::UNAUTHORIZED => QuizError::InvalidCredential,
        StatusCode::TOO_MANY_REQUESTS => QuizError::RateLimited,
        other => QuizError::UpstreamError {
            status: other.as_u16(),
            body,
        },
    }
}

fn message_content(response: &serde_json::Value) -> Result<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| QuizError::InvalidApiResponse {
            reason: format!("no message content in {response}"),
        })
}
