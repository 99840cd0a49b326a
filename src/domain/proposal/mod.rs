pub mod dto;
pub mod error;
pub mod prompt;
pub mod service;
pub mod validation;

pub use dto::{GenerateProposalRequest, GenerateProposalResponse};
pub use error::ProposalServiceError;
pub use prompt::{build_prompt, instruction_segments, InstructionSegment, Prompt};
pub use service::{GeneratedProposal, ProposalService, ProposalServiceApi};
pub use validation::{parse_proposal_request, validate_proposal_request, ValidatedProposalRequest};
