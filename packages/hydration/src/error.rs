use pagecraft_schema::{SchemaViolation, Violation};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydrationError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document has {} violation(s): {}", .0.len(), summarize(.0))]
    Invalid(Vec<Violation>),

    #[error("Cannot serialize node: {0}")]
    Encode(#[from] SchemaViolation),
}

impl HydrationError {
    /// Every violation found, empty for syntax and encode errors
    pub fn violations(&self) -> &[Violation] {
        match self {
            HydrationError::Invalid(violations) => violations,
            _ => &[],
        }
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
