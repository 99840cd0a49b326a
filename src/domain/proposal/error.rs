use crate::error::AppError;
use crate::infrastructure::gateway::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum ProposalServiceError {
    #[error("invalid input: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("rate limited by AI gateway")]
    RateLimited,
    #[error("AI gateway credits exhausted")]
    InsufficientCredits,
    #[error("no proposal generated")]
    NoProposal,
    #[error("{0} is not configured")]
    MissingConfiguration(&'static str),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error(transparent)]
    App(#[from] AppError),
}

impl From<GatewayError> for ProposalServiceError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::RateLimited => ProposalServiceError::RateLimited,
            GatewayError::InsufficientCredits => ProposalServiceError::InsufficientCredits,
            GatewayError::EmptyCompletion => ProposalServiceError::NoProposal,
            GatewayError::MissingApiKey(name) => ProposalServiceError::MissingConfiguration(name),
            GatewayError::Status { status, body } => {
                ProposalServiceError::Upstream(format!("status {}: {}", status, body))
            }
            GatewayError::Transport(e) => ProposalServiceError::Upstream(e.to_string()),
        }
    }
}

impl From<ProposalServiceError> for AppError {
    fn from(err: ProposalServiceError) -> Self {
        match err {
            ProposalServiceError::Invalid(violations) => AppError::Validation(violations),
            ProposalServiceError::RateLimited => AppError::RateLimitExceeded,
            ProposalServiceError::InsufficientCredits => AppError::InsufficientCredits,
            ProposalServiceError::NoProposal => AppError::NoProposalGenerated,
            ProposalServiceError::MissingConfiguration(name) => {
                AppError::MissingConfiguration(name.to_string())
            }
            ProposalServiceError::Upstream(msg) => AppError::ExternalService(msg),
            ProposalServiceError::App(e) => e,
        }
    }
}
