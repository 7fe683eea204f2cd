//! Prior authorization assistant.
//!
//! Decides whether a treatment needs payer prior authorization, builds the
//! supporting documentation checklist, and drafts a medical-necessity letter.
//! Every workflow combines a deterministic step with a generative
//! augmentation step and degrades to template output when no generative
//! backend is configured or a call fails.

pub mod augmentation;
pub mod config;
pub mod models;
pub mod rules;
pub mod workflow;

pub use config::AppConfig;
pub use models::{
    AuthDecision, Checklist, ChecklistItem, ChecklistRequest, Letter, LetterRequest,
    PatientContext, Rule,
};
pub use rules::{RuleMatcher, RuleStore, RuleStoreError};
pub use workflow::PriorAuthWorkflow;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`; otherwise uses `config::default_log_filter()`.
/// A second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}
