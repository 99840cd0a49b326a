use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::proposal::{GenerateProposalRequest, GenerateProposalResponse};
use crate::domain::subscription::{PlanSummary, PlansResponse, SubscriptionStatusResponse};
use crate::error::ErrorResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Typed client for the proposal HTTP API
#[derive(Debug, Clone)]
pub struct ProposalApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ProposalApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST /api/proposals/generate
    pub async fn generate_proposal(
        &self,
        access_token: &str,
        request: &GenerateProposalRequest,
    ) -> Result<String, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/proposals/generate"))
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await?;

        let body: GenerateProposalResponse = decode(response).await?;
        Ok(body.proposal)
    }

    /// GET /api/subscription
    pub async fn fetch_subscription(
        &self,
        access_token: &str,
    ) -> Result<SubscriptionStatusResponse, ClientError> {
        let response = self
            .http_client
            .get(self.url("/api/subscription"))
            .bearer_auth(access_token)
            .send()
            .await?;

        decode(response).await
    }

    /// GET /api/plans
    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>, ClientError> {
        let response = self.http_client.get(self.url("/api/plans")).send().await?;

        let body: PlansResponse = decode(response).await?;
        Ok(body.plans)
    }
}

/// Successful bodies are decoded as `T`; anything else becomes `ClientError::Api`
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &text),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        })
}
