//! Boundary checks for the assumptions compilation relies on.
//!
//! Compilation never rejects a workflow; these diagnostics let the caller
//! decide whether a degraded pipeline is acceptable.

use crate::compiler::{naming, parameter_key, resolve_parameter_type};
use crate::mapper::{destination_variant, source_variant};
use crate::workflow::{ParameterType, WorkflowConfig};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    MissingWorkflowId,
    NoDestinations,
    SelectWithoutOptions { parameter: String },
    DuplicateDestinationId { id: i64 },
    DuplicateDestinationName { name: String },
    DuplicateParameterKey { key: String },
    EmptyParameterKey { parameter: String, key: String },
    UnknownSourceType { kind: String },
    UnknownDestinationType { destination: String, kind: String },
    UnknownParameterType { parameter: String, param_type: String },
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingWorkflowId => "missing-workflow-id",
            DiagnosticKind::NoDestinations => "no-destinations",
            DiagnosticKind::SelectWithoutOptions { .. } => "select-without-options",
            DiagnosticKind::DuplicateDestinationId { .. } => "duplicate-destination-id",
            DiagnosticKind::DuplicateDestinationName { .. } => "duplicate-destination-name",
            DiagnosticKind::DuplicateParameterKey { .. } => "duplicate-parameter-key",
            DiagnosticKind::EmptyParameterKey { .. } => "empty-parameter-key",
            DiagnosticKind::UnknownSourceType { .. } => "unknown-source-type",
            DiagnosticKind::UnknownDestinationType { .. } => "unknown-destination-type",
            DiagnosticKind::UnknownParameterType { .. } => "unknown-parameter-type",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::MissingWorkflowId
            | DiagnosticKind::SelectWithoutOptions { .. }
            | DiagnosticKind::DuplicateDestinationId { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MissingWorkflowId => {
                write!(f, "workflow id is empty; generated identifiers have no id suffix")
            }
            DiagnosticKind::NoDestinations => {
                write!(f, "workflow has no destinations; the job will have no save stages")
            }
            DiagnosticKind::SelectWithoutOptions { parameter } => {
                write!(f, "select parameter '{}' has no options", parameter)
            }
            DiagnosticKind::DuplicateDestinationId { id } => {
                write!(f, "destination id {} is used more than once", id)
            }
            DiagnosticKind::DuplicateDestinationName { name } => write!(
                f,
                "destination name '{}' is used more than once; save stages are suffixed with destination ids",
                name
            ),
            DiagnosticKind::DuplicateParameterKey { key } => write!(
                f,
                "parameter key '{}' is declared more than once; only the first declaration is kept",
                key
            ),
            DiagnosticKind::EmptyParameterKey { parameter, key } => write!(
                f,
                "parameter '{}' has no identifier characters; it is exposed as '{}'",
                parameter, key
            ),
            DiagnosticKind::UnknownSourceType { kind } => write!(
                f,
                "source type '{}' is not supported; a placeholder loader is generated",
                kind
            ),
            DiagnosticKind::UnknownDestinationType { destination, kind } => write!(
                f,
                "destination '{}' has unsupported type '{}'; a placeholder writer is generated",
                destination, kind
            ),
            DiagnosticKind::UnknownParameterType {
                parameter,
                param_type,
            } => write!(
                f,
                "parameter '{}' has unknown type '{}'; it is typed as a string",
                parameter, param_type
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind) -> Self {
        Self {
            severity: kind.severity(),
            kind,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code(), self.kind)
    }
}

/// Checks a workflow against the assumptions compilation relies on.
pub fn validate(config: &WorkflowConfig) -> Vec<Diagnostic> {
    validate_with(config, &AHashMap::new())
}

pub(crate) fn validate_with(
    config: &WorkflowConfig,
    type_mappings: &AHashMap<String, ParameterType>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if config.workflow_id.is_empty() {
        diagnostics.push(Diagnostic::new(DiagnosticKind::MissingWorkflowId));
    }

    if source_variant(&config.source).is_placeholder() {
        diagnostics.push(Diagnostic::new(DiagnosticKind::UnknownSourceType {
            kind: config.source.kind().to_string(),
        }));
    }

    check_destinations(config, &mut diagnostics);
    check_parameters(config, type_mappings, &mut diagnostics);
    diagnostics
}

fn check_destinations(config: &WorkflowConfig, diagnostics: &mut Vec<Diagnostic>) {
    if config.destinations.is_empty() {
        diagnostics.push(Diagnostic::new(DiagnosticKind::NoDestinations));
        return;
    }

    for id in config.destinations.iter().map(|d| d.id).duplicates() {
        diagnostics.push(Diagnostic::new(DiagnosticKind::DuplicateDestinationId { id }));
    }

    // Names collide once sanitized, so compare what ends up in the identifiers.
    for name in config
        .destinations
        .iter()
        .map(|d| naming::save_operation_name(d.config.kind(), &d.name, d.id, ""))
        .zip(config.destinations.iter())
        .duplicates_by(|(op_name, _)| op_name.clone())
        .map(|(_, d)| d.name.clone())
    {
        diagnostics.push(Diagnostic::new(DiagnosticKind::DuplicateDestinationName {
            name,
        }));
    }

    for destination in &config.destinations {
        let kind = destination.config.kind();
        if destination_variant(&destination.config).is_placeholder() {
            diagnostics.push(Diagnostic::new(DiagnosticKind::UnknownDestinationType {
                destination: destination.name.clone(),
                kind: kind.to_string(),
            }));
        }
    }
}

fn check_parameters(
    config: &WorkflowConfig,
    type_mappings: &AHashMap<String, ParameterType>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut seen = AHashSet::new();
    for (index, parameter) in config.parameters().enumerate() {
        let key = parameter_key(&parameter.name, index + 1);
        if naming::sanitize_identifier(&parameter.name).is_empty() {
            diagnostics.push(Diagnostic::new(DiagnosticKind::EmptyParameterKey {
                parameter: parameter.name.clone(),
                key: key.clone(),
            }));
        }
        if !seen.insert(key.clone()) {
            diagnostics.push(Diagnostic::new(DiagnosticKind::DuplicateParameterKey { key }));
        }

        match resolve_parameter_type(&parameter.param_type, type_mappings) {
            ParameterType::Select if parameter.options.is_empty() => {
                diagnostics.push(Diagnostic::new(DiagnosticKind::SelectWithoutOptions {
                    parameter: parameter.name.clone(),
                }));
            }
            ParameterType::Other(param_type) => {
                diagnostics.push(Diagnostic::new(DiagnosticKind::UnknownParameterType {
                    parameter: parameter.name.clone(),
                    param_type,
                }));
            }
            _ => {}
        }
    }
}
