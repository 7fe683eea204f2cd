use std::collections::HashSet;
use std::path::Path;

use super::RuleStoreError;
use crate::models::{Rule, RuleConditions};

/// Immutable payer rule table, built once at startup and shared by `Arc`.
///
/// Store order is the tie-break for overlapping rules: the first rule that
/// matches a payer/code pair wins.
#[derive(Debug, Clone)]
pub struct RuleStore {
    rules: Vec<Rule>,
}

impl RuleStore {
    /// Build a store from an ordered rule list.
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleStoreError> {
        Self::validate(&rules)?;
        Ok(Self { rules })
    }

    fn validate(rules: &[Rule]) -> Result<(), RuleStoreError> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in rules {
            if rule.id.trim().is_empty() {
                return Err(RuleStoreError::InvalidRule {
                    id: rule.id.clone(),
                    reason: "empty id".into(),
                });
            }
            if rule.payer.trim().is_empty() || rule.code.trim().is_empty() {
                return Err(RuleStoreError::InvalidRule {
                    id: rule.id.clone(),
                    reason: "payer and code are required".into(),
                });
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(RuleStoreError::DuplicateId(rule.id.clone()));
            }
        }
        Ok(())
    }

    /// Built-in payer rules.
    pub fn builtin() -> Self {
        Self {
            rules: vec![
                Rule {
                    id: "R-001".into(),
                    payer: "MockHealth".into(),
                    code: "J9312".into(),
                    requires_auth: true,
                    conditions: RuleConditions {
                        diagnosis_keywords: vec![
                            "non-small cell lung cancer".into(),
                            "nsclc".into(),
                        ],
                        stages: vec!["stage iii".into(), "stage iv".into()],
                    },
                },
                Rule {
                    id: "R-002".into(),
                    payer: "MockHealth".into(),
                    code: "J9000".into(),
                    requires_auth: false,
                    conditions: RuleConditions::default(),
                },
                Rule {
                    id: "R-003".into(),
                    payer: "BlueCross".into(),
                    code: "J9312".into(),
                    requires_auth: true,
                    conditions: RuleConditions {
                        diagnosis_keywords: vec!["lung cancer".into()],
                        stages: vec!["stage iv".into()],
                    },
                },
            ],
        }
    }

    /// Parse a JSON array of rules.
    pub fn from_json(json: &str) -> Result<Self, RuleStoreError> {
        let rules: Vec<Rule> =
            serde_json::from_str(json).map_err(|e| RuleStoreError::Parse(e.to_string()))?;
        Self::new(rules)
    }

    /// Load a JSON rule table from disk.
    pub fn load(path: &Path) -> Result<Self, RuleStoreError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| RuleStoreError::Io(path.display().to_string(), e.to_string()))?;
        let store = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), rules = store.len(), "Loaded payer rule table");
        Ok(store)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::builtin()
    }
}
