use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    domain::proposal::{GenerateProposalResponse, ProposalService, ProposalServiceApi},
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

pub struct ProposalController {
    proposal_service: Arc<ProposalService>,
}

impl ProposalController {
    pub fn new(proposal_service: Arc<ProposalService>) -> Self {
        Self { proposal_service }
    }

    /// POST /api/proposals/generate - Generate a proposal for a job
    pub async fn generate(
        State(controller): State<Arc<ProposalController>>,
        Extension(auth_user): Extension<AuthUser>,
        payload: Result<Json<Value>, JsonRejection>,
    ) -> AppResult<Json<GenerateProposalResponse>> {
        let Json(body) = payload.map_err(|rejection| {
            AppError::validation(format!("Invalid JSON body: {}", rejection.body_text()))
        })?;

        let generated = controller
            .proposal_service
            .generate(auth_user.user_id, &body)
            .await
            .map_err(AppError::from)?;

        Ok(Json(GenerateProposalResponse {
            proposal: generated.proposal,
        }))
    }
}
