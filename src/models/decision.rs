use serde::{Deserialize, Serialize};

/// Outcome of an authorization check.
///
/// `rule_id` is set exactly when a payer rule matched; `auth_needed` is
/// `false` whenever no rule matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthDecision {
    pub auth_needed: bool,
    pub reason: String,
    #[serde(default)]
    pub rule_id: Option<String>,
}
