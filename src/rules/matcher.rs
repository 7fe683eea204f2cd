use std::sync::Arc;

use super::store::RuleStore;
use crate::models::Rule;

/// Payer/code lookup over a shared rule table.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    store: Arc<RuleStore>,
}

impl RuleMatcher {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    /// First rule in store order whose payer matches case-insensitively and
    /// whose code matches exactly. `None` is an expected result.
    pub fn find_rule(&self, payer: &str, code: &str) -> Option<&Rule> {
        self.store.iter().find(|rule| rule.matches(payer, code))
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }
}

/// Deterministic one-line reason for a match outcome.
pub fn describe_match(rule: Option<&Rule>, payer: &str, code: &str) -> String {
    match rule {
        Some(r) if r.requires_auth => {
            format!("Rule {}: {code} requires auth for {payer}.", r.id)
        }
        Some(r) => format!("Rule {}: {code} is exempt from auth for {payer}.", r.id),
        None => format!("No specific rule found for {code} under {payer}."),
    }
}
