use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("missing authorization header")]
    MissingCredential,
    #[error("invalid authorization format")]
    MalformedCredential,
    #[error("credential rejected: {0}")]
    Rejected(String),
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Unavailable(msg) => {
                AppError::Internal(format!("Identity provider unavailable: {}", msg))
            }
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}
