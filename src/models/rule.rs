use std::fmt;

use serde::{Deserialize, Serialize};

/// Advisory matching hints attached to a rule.
///
/// Reserved: carried with the rule and serialized, but never evaluated
/// against the patient context. Rule matching is payer + code only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConditions {
    #[serde(default)]
    pub diagnosis_keywords: Vec<String>,
    #[serde(default)]
    pub stages: Vec<String>,
}

impl RuleConditions {
    pub fn is_empty(&self) -> bool {
        self.diagnosis_keywords.is_empty() && self.stages.is_empty()
    }
}

/// A payer policy entry mapping a treatment code to an authorization requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    pub payer: String,
    pub code: String,
    pub requires_auth: bool,
    #[serde(default)]
    pub conditions: RuleConditions,
}

impl Rule {
    /// Payer compares case-insensitively, code exactly.
    pub fn matches(&self, payer: &str, code: &str) -> bool {
        self.code == code && self.payer.to_lowercase() == payer.to_lowercase()
    }
}

/// Preliminary authorization result handed to the explanation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    Required,
    NotRequired,
    /// No rule matched the payer/code pair.
    Unknown,
}

impl RuleOutcome {
    pub fn from_rule(rule: Option<&Rule>) -> Self {
        match rule {
            Some(r) if r.requires_auth => Self::Required,
            Some(_) => Self::NotRequired,
            None => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::NotRequired => "not required",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(payer: &str, code: &str, requires_auth: bool) -> Rule {
        Rule {
            id: "R-T".into(),
            payer: payer.into(),
            code: code.into(),
            requires_auth,
            conditions: RuleConditions::default(),
        }
    }

    #[test]
    fn payer_match_ignores_case() {
        let r = rule("MockHealth", "J9312", true);
        assert!(r.matches("mockhealth", "J9312"));
        assert!(r.matches("MOCKHEALTH", "J9312"));
    }

    #[test]
    fn code_match_is_exact() {
        let r = rule("MockHealth", "J9312", true);
        assert!(!r.matches("MockHealth", "j9312"));
        assert!(!r.matches("MockHealth", "J9312 "));
    }

    #[test]
    fn outcome_from_rule() {
        assert_eq!(RuleOutcome::from_rule(Some(&rule("A", "1", true))), RuleOutcome::Required);
        assert_eq!(RuleOutcome::from_rule(Some(&rule("A", "1", false))), RuleOutcome::NotRequired);
        assert_eq!(RuleOutcome::from_rule(None), RuleOutcome::Unknown);
    }

    #[test]
    fn conditions_default_when_absent() {
        let parsed: Rule = serde_json::from_str(
            r#"{"id":"R-9","payer":"Aetna","code":"J1000","requires_auth":false}"#,
        )
        .unwrap();
        assert!(parsed.conditions.is_empty());
    }
}
