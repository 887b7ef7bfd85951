use thiserror::Error;

/// Errors that can occur when converting a caller's workflow format into a `WorkflowConfig`.
#[derive(Error, Debug, Clone)]
pub enum WorkflowConversionError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error("Workflow id must be an integer or a string, found: {0}")]
    InvalidWorkflowId(String),

    #[error("Invalid workflow definition: {0}")]
    ValidationError(String),
}

/// Errors raised while persisting or restoring compiled pipeline artifacts.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),
}

/// Errors raised when turning a runtime configuration template into a concrete run config.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("No value supplied for placeholder(s): {}", .0.join(", "))]
    MissingValues(Vec<String>),
}
