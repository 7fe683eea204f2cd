use super::fallback::letter_date_today;
use super::parser::{parse_checklist_response, validate_explanation, validate_letter};
use super::prompt::{
    build_checklist_prompt, build_explanation_prompt, build_letter_prompt, AUTH_SYSTEM_PROMPT,
    CHECKLIST_SYSTEM_PROMPT, LETTER_SYSTEM_PROMPT,
};
use super::types::{AugmentationBackend, BackendKind, ExplanationRequest, LlmClient};
use super::AugmentationError;
use crate::config::LetterSettings;
use crate::models::{Checklist, ChecklistRequest, Letter, LetterRequest};

/// Backend that forwards every call to a generative client.
///
/// One client call per operation; no retries.
pub struct LiveBackend {
    client: Box<dyn LlmClient + Send + Sync>,
    letter: LetterSettings,
}

impl LiveBackend {
    pub fn new(client: Box<dyn LlmClient + Send + Sync>, letter: LetterSettings) -> Self {
        Self { client, letter }
    }

    fn call(&self, operation: &'static str, system: &str, prompt: &str) -> Result<String, AugmentationError> {
        let start = std::time::Instant::now();
        let result = self.client.generate(system, prompt);
        tracing::debug!(
            operation,
            provider = self.client.provider(),
            model = self.client.model(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Generative call finished"
        );
        result
    }
}

impl AugmentationBackend for LiveBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Live {
            provider: self.client.provider().to_string(),
            model: self.client.model().to_string(),
        }
    }

    fn explain_auth_need(&self, request: &ExplanationRequest) -> Result<String, AugmentationError> {
        let prompt = build_explanation_prompt(request);
        let response = self.call("explain_auth_need", AUTH_SYSTEM_PROMPT, &prompt)?;
        validate_explanation(&response)
    }

    /// Malformed content yields `Ok` with an empty checklist; only a failed
    /// call is an error.
    fn generate_checklist(&self, request: &ChecklistRequest) -> Result<Checklist, AugmentationError> {
        let prompt = build_checklist_prompt(request);
        let response = self.call("generate_checklist", CHECKLIST_SYSTEM_PROMPT, &prompt)?;
        Ok(parse_checklist_response(&response))
    }

    fn draft_letter(&self, request: &LetterRequest) -> Result<Letter, AugmentationError> {
        let prompt = build_letter_prompt(request, &self.letter, &letter_date_today());
        let response = self.call("draft_letter", LETTER_SYSTEM_PROMPT, &prompt)?;
        validate_letter(&response, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augmentation::mock::MockLlmClient;
    use crate::models::PatientContext;
    use crate::rules::RuleStore;

    fn backend(client: MockLlmClient) -> LiveBackend {
        LiveBackend::new(Box::new(client), LetterSettings::default())
    }

    #[test]
    fn kind_reports_client_identity() {
        let live = backend(MockLlmClient::new("x"));
        assert_eq!(
            live.kind(),
            BackendKind::Live {
                provider: "mock".into(),
                model: "mock-model".into()
            }
        );
    }

    #[test]
    fn explanation_passes_through_trimmed() {
        let live = backend(MockLlmClient::new("  Authorization is required because... \n"));
        let store = RuleStore::builtin();
        let context = PatientContext::new("MockHealth", "J9312", "NSCLC", "Stage IV");
        let request = ExplanationRequest::from_match(&context, store.get("R-001"));
        assert_eq!(
            live.explain_auth_need(&request).unwrap(),
            "Authorization is required because..."
        );
    }

    #[test]
    fn malformed_checklist_is_empty_not_error() {
        let live = backend(MockLlmClient::new("Sure! Here are some documents you might need."));
        let checklist = live
            .generate_checklist(&ChecklistRequest::new("Breast Cancer", "Stage II", "J9000"))
            .unwrap();
        assert!(checklist.is_empty());
    }

    #[test]
    fn checklist_call_failure_is_error() {
        let live = backend(MockLlmClient::unreachable());
        assert!(matches!(
            live.generate_checklist(&ChecklistRequest::new("a", "b", "c")),
            Err(AugmentationError::Connection(_))
        ));
    }

    #[test]
    fn letter_is_validated() {
        let request = LetterRequest::new("Jane Doe", "BlueCross", "J9312");

        let good = backend(MockLlmClient::new(
            "To BlueCross Utilization Management\nRe: Jane Doe, J9312\nSincerely,\nDr. Lee",
        ));
        assert!(good.draft_letter(&request).is_ok());

        let templated = backend(MockLlmClient::new(
            "To BlueCross\nRe: Jane Doe, J9312\nSincerely,\n[Your Name]",
        ));
        assert!(matches!(
            templated.draft_letter(&request),
            Err(AugmentationError::MalformedOutput(_))
        ));
    }
}
