use super::{CompletionGateway, GatewayError};
use crate::domain::proposal::Prompt;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Model used for every proposal
pub const MODEL: &str = "google/gemini-2.5-flash";

const API_KEY_VAR: &str = "AI_GATEWAY_API_KEY";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

/// OpenAI-compatible chat completions endpoint
pub struct ChatCompletionsGateway {
    http_client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl ChatCompletionsGateway {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            url,
            api_key,
        }
    }
}

/// Map a non-success upstream status to the error the caller should see
fn classify_failure(status: StatusCode, body: String) -> GatewayError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => GatewayError::InsufficientCredits,
        _ => GatewayError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

/// The body is read leniently: a malformed or empty payload means no proposal
fn extract_completion(body: &str) -> Result<String, GatewayError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "AI gateway returned an unreadable body");
        ChatCompletionResponse::default()
    });

    parsed.first_content().ok_or(GatewayError::EmptyCompletion)
}

#[async_trait]
impl CompletionGateway for ChatCompletionsGateway {
    async fn complete(&self, prompt: &Prompt) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GatewayError::MissingApiKey(API_KEY_VAR))?;

        let request = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        tracing::info!(
            model = MODEL,
            system_length = prompt.system.chars().count(),
            user_length = prompt.user.chars().count(),
            "Calling AI gateway"
        );

        let start_time = std::time::Instant::now();

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let latency_ms = start_time.elapsed().as_millis();

        if !status.is_success() {
            // The status alone decides the outcome; the body is only logged
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            tracing::error!(
                status = status.as_u16(),
                latency_ms = latency_ms,
                body = %body,
                "AI gateway error"
            );
            return Err(classify_failure(status, body));
        }

        let body = response.text().await?;
        let proposal = extract_completion(&body)?;

        tracing::info!(
            latency_ms = latency_ms,
            proposal_length = proposal.chars().count(),
            "AI gateway completion received"
        );

        Ok(proposal)
    }
}
