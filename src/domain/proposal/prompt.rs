//! Prompt assembly for proposal generation.
//!
//! The system prompt is an ordered list of instruction segments picked by
//! plan and joined at the end, so the per-plan rules can be checked without
//! looking at the final text.

use super::validation::ValidatedProposalRequest;
use crate::domain::subscription::Plan;

pub const EXECUTION_PLAN_MARKER: &str = "### PLANO DE EXECUÇÃO";
pub const TIPS_MARKER: &str = "### DICAS VALIOSAS";
pub const PROPOSAL_MARKER: &str = "### PROPOSTA";

const SEGMENT_SEPARATOR: &str = "\n\n";

const BASE_INSTRUCTIONS: &str = r#"Você é um especialista em criar propostas comerciais para freelancers.

Seu objetivo é criar uma proposta profissional, persuasiva e personalizada que:
1. Demonstre entendimento profundo do projeto
2. Destaque as qualificações relevantes do freelancer
3. Mostre entusiasmo genuíno e profissionalismo
4. Seja objetiva mas calorosa
5. Termine com um call-to-action claro

IMPORTANTE:
- Use um tom profissional mas acessível
- Seja específico sobre como o freelancer pode ajudar
- Evite clichês genéricos
- Mantenha a proposta concisa (200-300 palavras)
- Use português brasileiro
- NÃO inclua saudações como "Olá" ou "Prezado cliente" no início
- Comece diretamente falando sobre o projeto"#;

/// One block of the system prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionSegment {
    /// Rules every proposal follows
    Base,
    /// Execution plan and tips ahead of the proposal
    ExecutionPlanAndTips,
}

impl InstructionSegment {
    pub fn text(&self) -> String {
        match self {
            InstructionSegment::Base => BASE_INSTRUCTIONS.to_string(),
            InstructionSegment::ExecutionPlanAndTips => format!(
                "RECURSOS PREMIUM:\n\
                 Além da proposta, crie também um plano de execução do projeto e dicas valiosas \
                 personalizadas para o freelancer conquistar este cliente.\n\
                 Responda EXATAMENTE neste formato, com as três seções nesta ordem:\n\
                 \n\
                 {plan}\n\
                 (etapas do projeto com entregas e prazos estimados)\n\
                 \n\
                 {tips}\n\
                 (3 a 5 dicas práticas para se destacar e negociar com este cliente)\n\
                 \n\
                 {proposal}\n\
                 (a proposta comercial, seguindo todas as regras acima)",
                plan = EXECUTION_PLAN_MARKER,
                tips = TIPS_MARKER,
                proposal = PROPOSAL_MARKER,
            ),
        }
    }
}

/// Instruction segments for a plan, in output order.
///
/// Starter shares the free instruction set; the plans differ in quota only.
pub fn instruction_segments(plan: Plan) -> Vec<InstructionSegment> {
    match plan {
        Plan::Free | Plan::Starter => vec![InstructionSegment::Base],
        Plan::Premium => vec![
            InstructionSegment::Base,
            InstructionSegment::ExecutionPlanAndTips,
        ],
    }
}

/// System and user messages for the chat completion call
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

pub fn build_system_prompt(plan: Plan) -> String {
    instruction_segments(plan)
        .iter()
        .map(InstructionSegment::text)
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

pub fn build_user_prompt(request: &ValidatedProposalRequest) -> String {
    let mut prompt = format!("PERFIL DO FREELANCER:\n{}\n\n", request.profile);

    if let Some(examples) = request
        .old_proposals
        .as_deref()
        .filter(|text| !text.is_empty())
    {
        prompt.push_str(&format!(
            "EXEMPLOS DE PROPOSTAS ANTERIORES (para aprender o estilo):\n{}\n\n",
            examples
        ));
    }

    prompt.push_str(&format!(
        "DESCRIÇÃO DO JOB:\n{}\n\nCrie uma proposta comercial profissional para este projeto.",
        request.job_description
    ));

    prompt
}

pub fn build_prompt(request: &ValidatedProposalRequest, plan: Plan) -> Prompt {
    Prompt {
        system: build_system_prompt(plan),
        user: build_user_prompt(request),
    }
}
