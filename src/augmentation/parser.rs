use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::AugmentationError;
use crate::models::{Checklist, ChecklistItem, Letter, LetterRequest};

/// Markdown code fence, optionally tagged as JSON.
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z]*\s*(.*?)\s*```").unwrap());

/// Template tokens a drafted letter must not contain: `[Physician Name]`,
/// `{patient_name}`, `{{ code }}`.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[A-Z][A-Za-z .'/-]{1,40}\]|\{\{?\s*[A-Za-z_][A-Za-z0-9_]*\s*\}\}?").unwrap()
});

/// Parse generated checklist content. Parse-or-discard: anything that is not
/// a usable checklist becomes the empty checklist.
pub fn parse_checklist_response(response: &str) -> Checklist {
    match try_parse_checklist(response) {
        Ok(checklist) => checklist,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed checklist output");
            Checklist::empty()
        }
    }
}

fn try_parse_checklist(response: &str) -> Result<Checklist, AugmentationError> {
    let body = strip_code_fences(response);
    let json = locate_json(&body)
        .ok_or_else(|| AugmentationError::MalformedOutput("no JSON found in checklist output".into()))?;

    let value: Value = serde_json::from_str(json)
        .map_err(|e| AugmentationError::ResponseParsing(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("checklist") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AugmentationError::MalformedOutput(
                    "object without a checklist array".into(),
                ))
            }
        },
        _ => {
            return Err(AugmentationError::MalformedOutput(
                "checklist output is not a list".into(),
            ))
        }
    };

    let total = items.len();
    let checklist = parse_items_lenient(items);
    if checklist.len() < total {
        tracing::debug!(
            kept = checklist.len(),
            dropped = total - checklist.len(),
            "Skipped checklist entries missing required fields"
        );
    }
    Ok(checklist)
}

/// Keep entries that deserialize with a non-blank category and item.
fn parse_items_lenient(items: Vec<Value>) -> Checklist {
    items
        .into_iter()
        .filter_map(|v| serde_json::from_value::<ChecklistItem>(v).ok())
        .filter(|i| !i.category.trim().is_empty() && !i.item.trim().is_empty())
        .collect()
}

/// Return the content of the first code fence, or the trimmed input.
pub fn strip_code_fences(response: &str) -> String {
    CODE_FENCE
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| response.trim().to_string())
}

/// Find the JSON document inside model output that may carry prose around it.
fn locate_json(body: &str) -> Option<&str> {
    let trimmed = body.trim();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        return Some(trimmed);
    }
    let start = trimmed.find('[')?;
    let end = trimmed.rfind(']')?;
    (end > start).then(|| &trimmed[start..=end])
}

/// Template tokens left unresolved in `text`.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Accept a generated explanation if it carries any text.
pub fn validate_explanation(response: &str) -> Result<String, AugmentationError> {
    let text = response.trim();
    if text.is_empty() {
        return Err(AugmentationError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Accept a generated letter only if it names the patient, payer and code
/// verbatim and leaves no template tokens behind.
pub fn validate_letter(response: &str, request: &LetterRequest) -> Result<Letter, AugmentationError> {
    let text = if response.trim_start().starts_with("```") {
        strip_code_fences(response)
    } else {
        response.trim().to_string()
    };
    if text.is_empty() {
        return Err(AugmentationError::EmptyResponse);
    }

    for (field, value) in [
        ("patient name", request.patient_name.as_str()),
        ("payer", request.payer.as_str()),
        ("code", request.code.as_str()),
    ] {
        if !text.contains(value) {
            return Err(AugmentationError::MalformedOutput(format!(
                "letter omits the {field}"
            )));
        }
    }

    let leftovers = unresolved_placeholders(&text);
    if !leftovers.is_empty() {
        return Err(AugmentationError::MalformedOutput(format!(
            "letter contains {} unresolved placeholder(s)",
            leftovers.len()
        )));
    }

    Ok(Letter::new(text))
}
