use super::error::IdentityError;
use async_trait::async_trait;
use uuid::Uuid;

/// User resolved from a bearer token, injected into request extensions
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Exchanges a bearer token for the user it was issued to
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<AuthUser, IdentityError>;
}

/// Pull the token out of an `Authorization` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, IdentityError> {
    let header = header.ok_or(IdentityError::MissingCredential)?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(IdentityError::MalformedCredential)?;

    if token.is_empty() {
        return Err(IdentityError::MalformedCredential);
    }

    Ok(token)
}
