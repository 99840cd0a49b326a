use super::error::ProposalServiceError;
use super::prompt::build_prompt;
use super::validation::parse_proposal_request;
use crate::domain::subscription::{Plan, SubscriptionService};
use crate::infrastructure::gateway::CompletionGateway;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProposal {
    pub proposal: String,
    pub plan: Plan,
}

pub struct ProposalService {
    subscription_service: Arc<SubscriptionService>,
    gateway: Arc<dyn CompletionGateway>,
}

impl ProposalService {
    pub fn new(
        subscription_service: Arc<SubscriptionService>,
        gateway: Arc<dyn CompletionGateway>,
    ) -> Self {
        Self {
            subscription_service,
            gateway,
        }
    }
}

#[async_trait]
pub trait ProposalServiceApi: Send + Sync {
    /// Generate a proposal for an authenticated user
    ///
    /// This operation:
    /// - Validates the request body, before anything else is contacted
    /// - Resolves the user's plan and claims one generation from its allowance
    /// - Builds the prompt for the plan and calls the AI gateway once
    /// - Gives the claim back when the gateway call fails
    async fn generate(
        &self,
        user_id: Uuid,
        body: &Value,
    ) -> Result<GeneratedProposal, ProposalServiceError>;
}

#[async_trait]
impl ProposalServiceApi for ProposalService {
    async fn generate(
        &self,
        user_id: Uuid,
        body: &Value,
    ) -> Result<GeneratedProposal, ProposalServiceError> {
        let request = parse_proposal_request(body).map_err(ProposalServiceError::Invalid)?;

        let entitlement = self
            .subscription_service
            .entitlement(user_id, request.plan)
            .await?;

        let reservation = self
            .subscription_service
            .reserve_usage(user_id, entitlement.entitled)
            .await?;

        tracing::info!(
            user_id = %user_id,
            plan = %entitlement.effective,
            has_examples = request.old_proposals.is_some(),
            profile_length = request.profile.chars().count(),
            job_description_length = request.job_description.chars().count(),
            "Proposal generation request"
        );

        let prompt = build_prompt(&request, entitlement.effective);
        let proposal = match self.gateway.complete(&prompt).await {
            Ok(proposal) => proposal,
            Err(e) => {
                self.subscription_service.release_usage(reservation).await;
                return Err(e.into());
            }
        };

        tracing::info!(user_id = %user_id, "Proposal generated successfully");

        Ok(GeneratedProposal {
            proposal,
            plan: entitlement.effective,
        })
    }
}
