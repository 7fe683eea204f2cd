use serde::{Deserialize, Serialize};

/// Patient and treatment facts for a single authorization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContext {
    pub payer: String,
    pub code: String,
    pub diagnosis: String,
    pub stage: String,
    #[serde(default)]
    pub clinical_note: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
}

impl PatientContext {
    pub fn new(payer: &str, code: &str, diagnosis: &str, stage: &str) -> Self {
        Self {
            payer: payer.to_string(),
            code: code.to_string(),
            diagnosis: diagnosis.to_string(),
            stage: stage.to_string(),
            clinical_note: None,
            patient_name: None,
        }
    }

    pub fn with_clinical_note(mut self, note: &str) -> Self {
        self.clinical_note = Some(note.to_string());
        self
    }

    pub fn with_patient_name(mut self, name: &str) -> Self {
        self.patient_name = Some(name.to_string());
        self
    }
}
