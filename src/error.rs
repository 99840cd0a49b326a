use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const INSUFFICIENT_CREDITS_MESSAGE: &str = "Insufficient credits. Please add credits to continue.";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate proposal";
pub const NO_PROPOSAL_MESSAGE: &str = "No proposal generated";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Upstream rate limit exceeded")]
    RateLimitExceeded,

    #[error("Upstream credits exhausted")]
    InsufficientCredits,

    #[error("Plan limit reached: {0}")]
    PlanLimitReached(String),

    #[error("No proposal generated")]
    NoProposalGenerated,

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            Self::InsufficientCredits | Self::PlanLimitReached(_) => StatusCode::PAYMENT_REQUIRED,
            Self::Database(_)
            | Self::NoProposalGenerated
            | Self::MissingConfiguration(_)
            | Self::ExternalService(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller. Upstream and infrastructure
    /// details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(_) => UNAUTHORIZED_MESSAGE.to_string(),
            Self::Validation(violations) => violations.join("; "),
            Self::NotFound(what) => format!("{} not found", what),
            Self::RateLimitExceeded => RATE_LIMIT_MESSAGE.to_string(),
            Self::InsufficientCredits => INSUFFICIENT_CREDITS_MESSAGE.to_string(),
            Self::PlanLimitReached(msg) => msg.clone(),
            Self::NoProposalGenerated => NO_PROPOSAL_MESSAGE.to_string(),
            Self::ExternalService(_) => GENERATION_FAILED_MESSAGE.to_string(),
            Self::Database(_) | Self::MissingConfiguration(_) | Self::Internal(_) => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.public_message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
