use serde::{Deserialize, Serialize};

use crate::domain::subscription::Plan;

/// Body of POST /api/proposals/generate, as sent by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateProposalRequest {
    pub profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_proposals: Option<String>,
    pub job_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

/// Response for POST /api/proposals/generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateProposalResponse {
    pub proposal: String,
}
