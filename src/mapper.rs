//! Lookup tables from declared workflow types to generated schema types and stage variants.
//!
//! Both lookups are total: anything unrecognized degrades to the most
//! permissive answer (`FieldType::String`, a placeholder stage variant)
//! instead of failing.

use crate::workflow::{DestinationConfig, ParameterType, Source};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of a single key in an operation's configuration schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    Integer,
    Float,
    Boolean,
    String,
}

impl FieldType {
    /// The Python type token used inside a `Field(...)` declaration.
    pub fn python_type(self) -> &'static str {
        match self {
            FieldType::Integer => "int",
            FieldType::Float => "float",
            FieldType::Boolean => "bool",
            FieldType::String => "str",
        }
    }

    /// A literal default that satisfies the type.
    pub fn example_value(self) -> serde_json::Value {
        match self {
            FieldType::Integer => serde_json::json!(0),
            FieldType::Float => serde_json::json!(0.0),
            FieldType::Boolean => serde_json::json!(false),
            FieldType::String => serde_json::json!(""),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "Integer",
            FieldType::Float => "Float",
            FieldType::Boolean => "Boolean",
            FieldType::String => "String",
        };
        f.write_str(name)
    }
}

/// Maps a parameter's declared type onto its schema field type.
pub fn schema_field_type(param_type: &ParameterType) -> FieldType {
    match param_type {
        ParameterType::Integer => FieldType::Integer,
        ParameterType::Numeric | ParameterType::Float => FieldType::Float,
        ParameterType::Boolean => FieldType::Boolean,
        _ => FieldType::String,
    }
}

/// Which side of the pipeline a kind is being resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Source,
    Destination,
}

/// The operation template selected for a load or save stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OperationVariant {
    FileLoad,
    ApiLoad,
    PlaceholderLoad,
    CsvSave,
    ApiSave,
    PlaceholderSave,
}

impl OperationVariant {
    pub fn role(self) -> Role {
        match self {
            OperationVariant::FileLoad
            | OperationVariant::ApiLoad
            | OperationVariant::PlaceholderLoad => Role::Source,
            OperationVariant::CsvSave
            | OperationVariant::ApiSave
            | OperationVariant::PlaceholderSave => Role::Destination,
        }
    }

    pub fn is_placeholder(self) -> bool {
        matches!(
            self,
            OperationVariant::PlaceholderLoad | OperationVariant::PlaceholderSave
        )
    }
}

/// Selects the stage template for a source or destination kind.
pub fn operation_variant(kind: &str, role: Role) -> OperationVariant {
    let kind = kind.trim().to_ascii_lowercase();
    match (role, kind.as_str()) {
        (Role::Source, "file") => OperationVariant::FileLoad,
        (Role::Source, "api") => OperationVariant::ApiLoad,
        (Role::Source, _) => OperationVariant::PlaceholderLoad,
        (Role::Destination, "csv") => OperationVariant::CsvSave,
        (Role::Destination, "api") => OperationVariant::ApiSave,
        (Role::Destination, _) => OperationVariant::PlaceholderSave,
    }
}

/// Variant for a configured source. Follows the enum tag, so an
/// `Unknown` kind always gets the placeholder loader whatever its text says.
pub fn source_variant(source: &Source) -> OperationVariant {
    match source {
        Source::Unknown(_) => OperationVariant::PlaceholderLoad,
        known => operation_variant(known.kind(), Role::Source),
    }
}

/// Variant for a configured destination; `Unknown` always gets the placeholder writer.
pub fn destination_variant(config: &DestinationConfig) -> OperationVariant {
    match config {
        DestinationConfig::Unknown(_) => OperationVariant::PlaceholderSave,
        known => operation_variant(known.kind(), Role::Destination),
    }
}
