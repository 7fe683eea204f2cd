use std::fmt;

use serde::{Deserialize, Serialize};

/// A drafted medical-necessity letter. Opaque text once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Letter(String);

impl Letter {
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inputs for letter drafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterRequest {
    pub patient_name: String,
    pub payer: String,
    pub code: String,
    #[serde(default)]
    pub justification_points: Vec<String>,
    #[serde(default)]
    pub clinical_note: Option<String>,
}

impl LetterRequest {
    pub fn new(patient_name: &str, payer: &str, code: &str) -> Self {
        Self {
            patient_name: patient_name.to_string(),
            payer: payer.to_string(),
            code: code.to_string(),
            justification_points: Vec::new(),
            clinical_note: None,
        }
    }

    pub fn with_justification<I, S>(mut self, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.justification_points = points.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_clinical_note(mut self, note: &str) -> Self {
        self.clinical_note = Some(note.to_string());
        self
    }

    /// Justification points with blank entries removed.
    pub fn justification(&self) -> impl Iterator<Item = &str> {
        self.justification_points
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
    }
}
