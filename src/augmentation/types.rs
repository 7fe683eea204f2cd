use std::fmt;

use serde::Serialize;

use super::AugmentationError;
use crate::models::{
    Checklist, ChecklistRequest, Letter, LetterRequest, PatientContext, Rule, RuleOutcome,
};
use crate::rules::describe_match;

/// Context for explaining an authorization decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationRequest {
    pub payer: String,
    pub code: String,
    pub diagnosis: String,
    pub stage: String,
    pub clinical_note: Option<String>,
    pub outcome: RuleOutcome,
    pub rule_id: Option<String>,
    /// Deterministic reason from the rule match.
    pub preliminary_reason: String,
}

impl ExplanationRequest {
    pub fn from_match(context: &PatientContext, rule: Option<&Rule>) -> Self {
        Self {
            payer: context.payer.clone(),
            code: context.code.clone(),
            diagnosis: context.diagnosis.clone(),
            stage: context.stage.clone(),
            clinical_note: context.clinical_note.clone(),
            outcome: RuleOutcome::from_rule(rule),
            rule_id: rule.map(|r| r.id.clone()),
            preliminary_reason: describe_match(rule, &context.payer, &context.code),
        }
    }
}

/// Which augmentation variant is serving requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendKind {
    Live { provider: String, model: String },
    Fallback,
}

impl BackendKind {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live { provider, model } => write!(f, "live ({provider}/{model})"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Turns deterministic facts into explanations, checklists and letters.
///
/// Implementations may fail; the workflow layer substitutes fallback output
/// for any failed call.
pub trait AugmentationBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn explain_auth_need(&self, request: &ExplanationRequest) -> Result<String, AugmentationError>;

    /// An empty checklist means the backend produced nothing usable.
    fn generate_checklist(&self, request: &ChecklistRequest)
        -> Result<Checklist, AugmentationError>;

    fn draft_letter(&self, request: &LetterRequest) -> Result<Letter, AugmentationError>;
}

/// Generative text client abstraction (allows mocking).
pub trait LlmClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, AugmentationError>;

    /// Short provider label for logs, e.g. `"azure_openai"`.
    fn provider(&self) -> &'static str;

    /// Model or deployment identifier.
    fn model(&self) -> &str;
}
