use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::domain::auth::{bearer_token, IdentityProvider};
use crate::error::AppError;

/// Authentication middleware.
///
/// Runs before body extraction, so unauthenticated requests are refused
/// without being validated or forwarded anywhere.
pub async fn auth_middleware(
    State(identity_provider): State<Arc<dyn IdentityProvider>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = bearer_token(header)?;
    let user = identity_provider.resolve(token).await?;

    tracing::debug!(user_id = %user.user_id, "Request authenticated");

    // Add user context to request
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
