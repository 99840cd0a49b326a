use serde_json::{Map, Value};

use crate::domain::subscription::Plan;

pub const MIN_TEXT_LENGTH: usize = 10;
pub const MAX_PROFILE_LENGTH: usize = 5000;
pub const MAX_JOB_DESCRIPTION_LENGTH: usize = 5000;
pub const MAX_OLD_PROPOSALS_LENGTH: usize = 3000;

/// Fields of a generation request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProposalRequest {
    pub profile: String,
    pub old_proposals: Option<String>,
    pub job_description: String,
    pub plan: Option<Plan>,
}

/// Check a decoded request body against the field rules.
///
/// Returns every violation found, or an empty list when the body is valid.
pub fn validate_proposal_request(body: &Value) -> Vec<String> {
    let Some(object) = body.as_object() else {
        return vec!["Request body must be a JSON object".to_string()];
    };

    let mut violations = Vec::new();

    check_required_text(object, "profile", MAX_PROFILE_LENGTH, &mut violations);
    check_required_text(object, "jobDescription", MAX_JOB_DESCRIPTION_LENGTH, &mut violations);

    match present(object, "oldProposals") {
        None => {}
        Some(Value::String(text)) => {
            if char_len(text) > MAX_OLD_PROPOSALS_LENGTH {
                violations.push(format!(
                    "oldProposals must be at most {} characters",
                    MAX_OLD_PROPOSALS_LENGTH
                ));
            }
        }
        Some(_) => violations.push("oldProposals must be a string".to_string()),
    }

    match present(object, "plan") {
        None => {}
        Some(Value::String(key)) if Plan::from_key(key).is_some() => {}
        Some(_) => violations.push("plan must be one of: free, starter, premium".to_string()),
    }

    violations
}

/// Validate and extract the request fields in one step
pub fn parse_proposal_request(body: &Value) -> Result<ValidatedProposalRequest, Vec<String>> {
    let violations = validate_proposal_request(body);
    if !violations.is_empty() {
        return Err(violations);
    }

    let text = |field: &str| -> Option<String> {
        body.get(field).and_then(Value::as_str).map(str::to_string)
    };

    Ok(ValidatedProposalRequest {
        profile: text("profile").unwrap_or_default(),
        old_proposals: text("oldProposals"),
        job_description: text("jobDescription").unwrap_or_default(),
        plan: body
            .get("plan")
            .and_then(Value::as_str)
            .and_then(Plan::from_key),
    })
}

/// A field counts as present unless it is missing or `null`
fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| !value.is_null())
}

fn check_required_text(
    object: &Map<String, Value>,
    field: &str,
    max_length: usize,
    violations: &mut Vec<String>,
) {
    match present(object, field) {
        None => violations.push(format!("{} is required", field)),
        Some(Value::String(text)) => {
            if char_len(text.trim()) < MIN_TEXT_LENGTH {
                violations.push(format!(
                    "{} must be at least {} characters",
                    field, MIN_TEXT_LENGTH
                ));
            }
            if char_len(text) > max_length {
                violations.push(format!("{} must be at most {} characters", field, max_length));
            }
        }
        Some(_) => violations.push(format!("{} must be a string", field)),
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
