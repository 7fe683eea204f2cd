use std::sync::Arc;

use uuid::Uuid;

use super::AuthStage;
use crate::augmentation::{
    select_backend, AugmentationBackend, BackendKind, ExplanationRequest, FallbackBackend,
};
use crate::config::{AppConfig, LetterSettings};
use crate::models::{AuthDecision, Checklist, ChecklistRequest, Letter, LetterRequest, PatientContext};
use crate::rules::{RuleMatcher, RuleStore, RuleStoreError};

/// Runs the three prior authorization workflows:
/// rule match → explanation, checklist generation, letter drafting.
///
/// Every operation is total. A failed or unusable generative call is logged
/// and replaced by the fallback generator's output for that call only.
pub struct PriorAuthWorkflow {
    matcher: RuleMatcher,
    backend: Box<dyn AugmentationBackend>,
    fallback: FallbackBackend,
}

impl PriorAuthWorkflow {
    pub fn new(rules: Arc<RuleStore>, backend: Box<dyn AugmentationBackend>, letter: LetterSettings) -> Self {
        Self {
            matcher: RuleMatcher::new(rules),
            backend,
            fallback: FallbackBackend::new(letter),
        }
    }

    /// Select the augmentation backend from `config`.
    pub fn from_config(rules: Arc<RuleStore>, config: &AppConfig) -> Self {
        let backend = select_backend(&config.augmentation, &config.letter);
        Self::new(rules, backend, config.letter.clone())
    }

    /// Build from the process environment. Fails only if a configured rule
    /// file cannot be loaded.
    pub fn from_env() -> Result<Self, RuleStoreError> {
        let config = AppConfig::from_env();
        let rules = match &config.rules_path {
            Some(path) => RuleStore::load(path)?,
            None => RuleStore::builtin(),
        };
        Ok(Self::from_config(Arc::new(rules), &config))
    }

    /// Re-run backend selection, e.g. after configuration changed.
    pub fn reselect(&mut self, config: &AppConfig) {
        self.backend = select_backend(&config.augmentation, &config.letter);
        self.fallback = FallbackBackend::new(config.letter.clone());
        tracing::info!(backend = %self.backend.kind(), "Augmentation backend reselected");
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn rules(&self) -> &RuleStore {
        self.matcher.store()
    }

    /// Decide whether `context` needs prior authorization and explain why.
    ///
    /// `auth_needed` comes from the matched rule alone; the backend only
    /// supplies the wording of `reason`.
    pub fn decide_auth(&self, context: &PatientContext) -> AuthDecision {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("decide_auth", %request_id, backend = %self.backend.kind());
        let _enter = span.enter();

        let mut stage = AuthStage::AwaitingRuleMatch;
        let rule = self.matcher.find_rule(&context.payer, &context.code);
        stage = stage.advance();
        tracing::debug!(
            %stage,
            rule_id = rule.map(|r| r.id.as_str()).unwrap_or("none"),
            "Rule match complete"
        );

        let request = ExplanationRequest::from_match(context, rule);
        let reason = match self.backend.explain_auth_need(&request) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("Explanation was empty, using fallback");
                self.fallback.explain(&request)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Explanation failed, using fallback");
                self.fallback.explain(&request)
            }
        };
        stage = stage.advance();

        let decision = AuthDecision {
            auth_needed: rule.is_some_and(|r| r.requires_auth),
            reason,
            rule_id: request.rule_id,
        };
        tracing::info!(
            %stage,
            outcome = %request.outcome,
            auth_needed = decision.auth_needed,
            "Authorization check complete"
        );
        decision
    }

    /// Documentation checklist for a submission. Never empty.
    pub fn build_checklist(&self, request: &ChecklistRequest) -> Checklist {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("build_checklist", %request_id, backend = %self.backend.kind());
        let _enter = span.enter();

        let checklist = match self.backend.generate_checklist(request) {
            Ok(checklist) if !checklist.is_empty() => checklist,
            Ok(_) => {
                tracing::warn!("Generated checklist was empty or unusable, using fallback");
                self.fallback.checklist(request)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Checklist generation failed, using fallback");
                self.fallback.checklist(request)
            }
        };

        tracing::info!(
            items = checklist.len(),
            mandatory = checklist.mandatory_count(),
            "Checklist ready"
        );
        checklist
    }

    /// Draft a medical-necessity letter.
    pub fn draft_letter(&self, request: &LetterRequest) -> Letter {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("draft_letter", %request_id, backend = %self.backend.kind());
        let _enter = span.enter();

        let letter = match self.backend.draft_letter(request) {
            Ok(letter) => letter,
            Err(e) => {
                tracing::warn!(error = %e, "Letter drafting failed, using fallback");
                self.fallback.letter(request)
            }
        };

        tracing::info!(chars = letter.as_str().len(), "Letter drafted");
        letter
    }
}
