use std::process::ExitCode;

use priorauth_lib::config::{APP_NAME, APP_VERSION};
use priorauth_lib::{ChecklistRequest, LetterRequest, PatientContext, PriorAuthWorkflow};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    priorauth_lib::init_tracing();

    tracing::info!("{} v{} starting", APP_NAME, APP_VERSION);

    let workflow = match PriorAuthWorkflow::from_env() {
        Ok(workflow) => workflow,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load rule table");
            return ExitCode::FAILURE;
        }
    };
    println!("Augmentation backend: {}", workflow.backend_kind());

    println!("\n--- Authorization check ---");
    let context = PatientContext::new(
        "MockHealth",
        "J9312",
        "Non-small cell lung cancer",
        "Stage IV",
    )
    .with_clinical_note("Progressed after first-line platinum doublet. ECOG 1.");
    let decision = workflow.decide_auth(&context);
    println!("Auth needed: {}", decision.auth_needed);
    println!("Rule: {}", decision.rule_id.as_deref().unwrap_or("none"));
    println!("Reason: {}", decision.reason);

    println!("\n--- Documentation checklist ---");
    let checklist = workflow.build_checklist(&ChecklistRequest::new("Breast Cancer", "Stage II", "J9000"));
    for item in &checklist {
        let flag = if item.mandatory { "required" } else { "optional" };
        println!("[{}] {} ({flag}): {}", item.category, item.item, item.reason);
    }

    println!("\n--- Medical necessity letter ---");
    let request = LetterRequest::new("Jane Doe", "BlueCross", "J9312").with_justification([
        "Stage IV NSCLC with disease progression after first-line therapy",
        "PD-L1 expression of 60% on recent biopsy",
        "No contraindication to immunotherapy",
    ]);
    println!("{}", workflow.draft_letter(&request));

    ExitCode::SUCCESS
}
