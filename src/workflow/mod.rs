pub mod orchestrator;

pub use orchestrator::PriorAuthWorkflow;

use std::fmt;

/// Progress of one authorization check. Linear, no loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    AwaitingRuleMatch,
    AwaitingExplanation,
    Done,
}

impl AuthStage {
    /// Next stage; `Done` is terminal.
    pub fn advance(self) -> Self {
        match self {
            Self::AwaitingRuleMatch => Self::AwaitingExplanation,
            Self::AwaitingExplanation | Self::Done => Self::Done,
        }
    }

    pub fn is_done(self) -> bool {
        self == Self::Done
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingRuleMatch => "awaiting_rule_match",
            Self::AwaitingExplanation => "awaiting_explanation",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_linearly() {
        let stage = AuthStage::AwaitingRuleMatch;
        assert_eq!(stage.advance(), AuthStage::AwaitingExplanation);
        assert_eq!(stage.advance().advance(), AuthStage::Done);
        assert_eq!(AuthStage::Done.advance(), AuthStage::Done);
        assert!(stage.advance().advance().is_done());
        assert_eq!(AuthStage::AwaitingExplanation.to_string(), "awaiting_explanation");
    }
}
