use crate::mapper::FieldType;
use std::fmt;

/// One key of an operation's (or resource's) configuration schema.
///
/// The same value drives the `Field(...)` declaration and the job default in
/// the pipeline source, and the placeholder in the runtime template.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigField {
    pub key: String,
    pub field_type: FieldType,
    pub required: bool,
    /// Credential-shaped values are declared as `StringSource` and default to an env lookup.
    pub secret: bool,
    pub description: String,
    pub default: DefaultValue,
}

impl ConfigField {
    pub fn required(key: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            key: key.to_string(),
            field_type,
            required: true,
            secret: false,
            description: description.to_string(),
            default: DefaultValue::Literal(field_type.example_value()),
        }
    }

    pub fn optional(key: &str, field_type: FieldType, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(key, field_type, description)
        }
    }

    /// An optional credential read from the environment variable `env_var` by default.
    pub fn secret(key: &str, env_var: String, description: &str) -> Self {
        Self {
            key: key.to_string(),
            field_type: FieldType::String,
            required: false,
            secret: true,
            description: description.to_string(),
            default: DefaultValue::Env(env_var),
        }
    }

    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = DefaultValue::Literal(value.into());
        self
    }
}

/// The literal default written into the job's config block.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(serde_json::Value),
    /// Resolved from the named environment variable at run time.
    Env(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => write!(f, "{}", value),
            DefaultValue::Env(var) => write!(f, "env:{}", var),
        }
    }
}
