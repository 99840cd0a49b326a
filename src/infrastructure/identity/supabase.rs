use crate::domain::auth::{AuthUser, IdentityError, IdentityProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

const USER_PATH: &str = "/auth/v1/user";

#[derive(Debug, Deserialize)]
pub struct SupabaseUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Resolves tokens by asking the hosted auth service who they belong to
pub struct SupabaseIdentityProvider {
    base_url: String,
    anon_key: String,
    http_client: reqwest::Client,
}

impl SupabaseIdentityProvider {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            http_client: reqwest::Client::new(),
        }
    }

    fn user_url(&self) -> String {
        format!("{}{}", self.base_url, USER_PATH)
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<AuthUser, IdentityError> {
        let response = self
            .http_client
            .get(self.user_url())
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(IdentityError::Rejected(format!(
                "identity provider returned {}",
                status.as_u16()
            )));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IdentityError::Unavailable(format!(
                "status {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let user: SupabaseUser = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("Failed to parse user: {}", e)))?;

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
        })
    }
}
