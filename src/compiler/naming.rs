//! Deterministic identifiers for generated operations, jobs, env vars and placeholders.

use crate::workflow::WorkflowId;
use ahash::AHashSet;
use itertools::Itertools;

/// Keeps `[A-Za-z0-9_]` and lower-cases the result. One-way.
pub fn sanitize_identifier(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The id as embedded into identifiers. Empty ids stay empty.
pub fn workflow_token(id: &WorkflowId) -> String {
    match id {
        WorkflowId::Int(n) => signed_token(*n),
        WorkflowId::Text(text) => sanitize_identifier(text),
    }
}

fn signed_token(n: i64) -> String {
    if n < 0 {
        format!("m{}", n.unsigned_abs())
    } else {
        n.to_string()
    }
}

pub fn load_operation_name(workflow: &str) -> String {
    format!("load_input_{}", workflow)
}

pub fn process_operation_name(workflow: &str) -> String {
    format!("process_data_{}", workflow)
}

pub fn job_name(workflow: &str) -> String {
    format!("workflow_{}", workflow)
}

/// `save_<kind>_<name>_<workflow>`, before collision handling.
pub fn save_operation_name(kind: &str, name: &str, destination_id: i64, workflow: &str) -> String {
    let kind = match sanitize_identifier(kind) {
        k if k.is_empty() => "default".to_string(),
        k => k,
    };
    let name = match sanitize_identifier(name) {
        n if n.is_empty() => format!("output_{}", signed_token(destination_id)),
        n => n,
    };
    format!("save_{}_{}_{}", kind, name, workflow)
}

/// Makes save identifiers unique.
///
/// Every member of a colliding group gets its destination id appended; a name
/// that still repeats (duplicate ids) gets its 1-based position appended on
/// each later occurrence.
pub fn disambiguate(candidates: Vec<(String, i64)>) -> Vec<String> {
    let counts = candidates.iter().map(|(name, _)| name.clone()).counts();
    let with_ids: Vec<String> = candidates
        .into_iter()
        .map(|(name, id)| {
            if counts.get(&name).copied().unwrap_or(0) > 1 {
                format!("{}_{}", name, signed_token(id))
            } else {
                name
            }
        })
        .collect();

    let mut seen = AHashSet::new();
    with_ids
        .into_iter()
        .enumerate()
        .map(|(position, name)| {
            let mut unique = name;
            while !seen.insert(unique.clone()) {
                unique = format!("{}_{}", unique, position + 1);
            }
            unique
        })
        .collect()
}

/// Environment variable that backs a credential field by default.
pub fn env_var_name(operation: &str, key: &str) -> String {
    format!("{}_{}", operation, key).to_ascii_uppercase()
}

/// The named hole written into the runtime configuration template.
pub fn placeholder(scope: &str, key: &str) -> String {
    format!("{{{{{}.{}}}}}", scope, key)
}
