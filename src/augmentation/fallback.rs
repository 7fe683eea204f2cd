use chrono::{Local, NaiveDate};

use super::types::{AugmentationBackend, BackendKind, ExplanationRequest};
use super::AugmentationError;
use crate::config::LetterSettings;
use crate::models::{
    Checklist, ChecklistItem, ChecklistRequest, Letter, LetterRequest, RuleOutcome,
};

/// Letter date in long form, e.g. "March 3, 2026".
pub fn format_letter_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn letter_date_today() -> String {
    format_letter_date(Local::now().date_naive())
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

/// Deterministic template generators. Never fail, never return empty output.
#[derive(Debug, Clone, Default)]
pub struct FallbackBackend {
    letter: LetterSettings,
}

impl FallbackBackend {
    pub fn new(letter: LetterSettings) -> Self {
        Self { letter }
    }

    /// Explanation derived only from the rule match outcome.
    pub fn explain(&self, request: &ExplanationRequest) -> String {
        let diagnosis = or_default(&request.diagnosis, "the stated diagnosis");
        let stage = or_default(&request.stage, "unspecified stage");
        let rule = request.rule_id.as_deref().unwrap_or("on file");

        match request.outcome {
            RuleOutcome::Required => format!(
                "For {code} under {payer}, prior authorization is required (rule {rule}). \
                 Submit the request for {diagnosis} ({stage}) with supporting documentation \
                 before treatment begins.",
                code = request.code,
                payer = request.payer,
            ),
            RuleOutcome::NotRequired => format!(
                "For {code} under {payer}, prior authorization is not required (rule {rule}). \
                 Treatment for {diagnosis} ({stage}) can proceed under standard coverage terms.",
                code = request.code,
                payer = request.payer,
            ),
            RuleOutcome::Unknown => format!(
                "No specific rule found for {code} under {payer}. Standard protocol suggests \
                 verifying prior authorization requirements with the payer directly.",
                code = request.code,
                payer = request.payer,
            ),
        }
    }

    /// Minimum documentation set for any prior authorization submission.
    pub fn checklist(&self, request: &ChecklistRequest) -> Checklist {
        let diagnosis = or_default(&request.diagnosis, "the primary diagnosis");
        let stage = or_default(&request.stage, "current disease");

        Checklist::new(vec![
            ChecklistItem::new(
                "Authorization",
                "Signed patient consent and completed payer prior authorization request form",
                true,
                "Payers will not review a request without patient consent and the request form.",
            ),
            ChecklistItem::new(
                "Pathology",
                &format!("Pathology or biopsy report confirming {diagnosis}"),
                true,
                "Required to verify diagnosis specificity.",
            ),
            ChecklistItem::new(
                "Imaging",
                &format!("Recent CT/PET imaging documenting {stage} staging"),
                true,
                "Needed to establish disease progression and staging.",
            ),
            ChecklistItem::new(
                "Treatment History",
                &format!(
                    "Prior therapy history and response supporting the request for {}",
                    or_default(&request.code, "the requested treatment")
                ),
                true,
                "Establishes medical necessity over alternative therapies.",
            ),
            ChecklistItem::new(
                "Clinical Notes",
                "Treating physician consultation notes from the last 30 days",
                true,
                "Verifies current clinical status and treatment plan.",
            ),
            ChecklistItem::new(
                "Lab",
                "Recent laboratory results",
                false,
                "Supports the treatment safety assessment.",
            ),
        ])
    }

    /// Letter dated today.
    pub fn letter(&self, request: &LetterRequest) -> Letter {
        self.letter_with_date(request, &letter_date_today())
    }

    pub fn letter_with_date(&self, request: &LetterRequest, date: &str) -> Letter {
        // Identity fields go in exactly as supplied.
        let patient = request.patient_name.as_str();
        let payer = request.payer.as_str();
        let code = request.code.as_str();

        let mut sections = vec![
            format!("Date: {date}"),
            format!(
                "To: {payer} Utilization Management\nRe: Medical Necessity for {patient}\nTreatment Code: {code}"
            ),
            "To Whom It May Concern,".to_string(),
            format!(
                "I am writing to provide clinical justification for the treatment of my patient, \
                 {patient}, with the requested therapy ({code})."
            ),
        ];

        if let Some(note) = request.clinical_note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            sections.push(format!("Clinical summary: {note}"));
        }

        let points: Vec<String> = request.justification().map(|p| format!("- {p}")).collect();
        if points.is_empty() {
            sections.push(
                "The patient has a confirmed diagnosis that requires this specific intervention. \
                 Supporting clinical documentation is enclosed with this request."
                    .to_string(),
            );
        } else {
            sections.push(format!(
                "The patient has a confirmed diagnosis that requires this specific intervention. \
                 The following clinical factors support this request:\n{}",
                points.join("\n")
            ));
        }

        sections.push(
            "This treatment aligns with current clinical guidelines and is considered the \
             standard of care for this clinical presentation."
                .to_string(),
        );
        sections.push("Please review the enclosed documentation for further details.".to_string());

        let mut signature = format!("Sincerely,\n\n{}", self.letter.physician_name.trim());
        if let Some(institution) = self.letter.institution.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
            signature.push('\n');
            signature.push_str(institution);
        }
        sections.push(signature);

        Letter::new(sections.join("\n\n"))
    }
}

impl AugmentationBackend for FallbackBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn explain_auth_need(&self, request: &ExplanationRequest) -> Result<String, AugmentationError> {
        Ok(self.explain(request))
    }

    fn generate_checklist(&self, request: &ChecklistRequest) -> Result<Checklist, AugmentationError> {
        Ok(self.checklist(request))
    }

    fn draft_letter(&self, request: &LetterRequest) -> Result<Letter, AugmentationError> {
        Ok(self.letter(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augmentation::parser::unresolved_placeholders;
    use crate::models::PatientContext;
    use crate::rules::RuleStore;

    fn explain_for(payer: &str, code: &str) -> String {
        let store = RuleStore::builtin();
        let context = PatientContext::new(payer, code, "Non-small cell lung cancer", "Stage IV");
        let rule = store.iter().find(|r| r.matches(payer, code));
        FallbackBackend::default().explain(&ExplanationRequest::from_match(&context, rule))
    }

    #[test]
    fn explanation_follows_outcome() {
        let required = explain_for("MockHealth", "J9312");
        assert!(required.contains("is required (rule R-001)"));

        let exempt = explain_for("MockHealth", "J9000");
        assert!(exempt.contains("is not required (rule R-002)"));

        let unknown = explain_for("Aetna", "Z0000");
        assert!(unknown.starts_with("No specific rule found for Z0000 under Aetna."));
    }

    #[test]
    fn explanation_tolerates_blank_fields() {
        let context = PatientContext::new("MockHealth", "J9312", " ", "");
        let store = RuleStore::builtin();
        let text = FallbackBackend::default()
            .explain(&ExplanationRequest::from_match(&context, store.get("R-001")));
        assert!(text.contains("the stated diagnosis (unspecified stage)"));
    }

    #[test]
    fn checklist_has_minimum_coverage() {
        let checklist =
            FallbackBackend::default().checklist(&ChecklistRequest::new("Breast Cancer", "Stage II", "J9000"));
        assert!(checklist.len() >= 3);
        assert!(checklist
            .iter()
            .any(|i| i.category == "Authorization" && i.item.contains("consent")));
        assert!(checklist.iter().any(|i| i.item.contains("confirming Breast Cancer")));
        assert!(checklist.iter().any(|i| i.category == "Treatment History"));
    }

    #[test]
    fn letter_contains_identity_and_points() {
        let request = LetterRequest::new("Jane Doe", "BlueCross", "J9312")
            .with_justification(["Stage IV disease", "  ", "Progressed on carboplatin"])
            .with_clinical_note("ECOG 1, adequate organ function.");
        let letter = FallbackBackend::default().letter_with_date(&request, "March 3, 2026");
        let text = letter.as_str();
        assert!(text.starts_with("Date: March 3, 2026"));
        assert!(text.contains("To: BlueCross Utilization Management"));
        assert!(text.contains("Re: Medical Necessity for Jane Doe"));
        assert!(text.contains("Treatment Code: J9312"));
        assert!(text.contains("- Stage IV disease\n- Progressed on carboplatin"));
        assert!(text.contains("Clinical summary: ECOG 1, adequate organ function."));
        assert!(!text.contains("-  "));
    }

    #[test]
    fn empty_justification_leaves_no_markers() {
        let request = LetterRequest::new("Jane Doe", "BlueCross", "J9312");
        let letter = FallbackBackend::default().letter(&request);
        let text = letter.as_str();
        assert!(unresolved_placeholders(text).is_empty());
        assert!(!text.contains("\n- "));
        assert!(!text.contains('{'));
        assert!(text.contains("Supporting clinical documentation is enclosed"));
        assert!(text.contains("Jane Doe") && text.contains("BlueCross") && text.contains("J9312"));
    }

    #[test]
    fn padded_identity_fields_kept_verbatim() {
        let request = LetterRequest::new("Jane Doe ", " BlueCross", "J9312\t");
        let letter = FallbackBackend::default().letter_with_date(&request, "March 3, 2026");
        let text = letter.as_str();
        assert!(text.contains(&request.patient_name));
        assert!(text.contains(&request.payer));
        assert!(text.contains(&request.code));
    }

    #[test]
    fn signature_uses_settings() {
        let backend = FallbackBackend::new(LetterSettings {
            physician_name: "Dr. Ada Okafor".into(),
            institution: Some("Riverside Oncology".into()),
        });
        let letter = backend.letter_with_date(&LetterRequest::new("J", "P", "C"), "May 1, 2026");
        assert!(letter.as_str().ends_with("Sincerely,\n\nDr. Ada Okafor\nRiverside Oncology"));
    }

    #[test]
    fn letter_date_is_long_form() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        assert_eq!(format_letter_date(date), "March 3, 2026");
    }

    #[test]
    fn backend_trait_never_fails() {
        let backend = FallbackBackend::default();
        assert_eq!(backend.kind(), BackendKind::Fallback);
        assert!(backend
            .generate_checklist(&ChecklistRequest::new("", "", ""))
            .unwrap()
            .len()
            >= 3);
        assert!(!backend
            .draft_letter(&LetterRequest::new("A", "B", "C"))
            .unwrap()
            .as_str()
            .is_empty());
    }
}
