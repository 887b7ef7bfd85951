use serde::{Deserialize, Serialize};
use std::fmt;

/// The complete, canonical description of a workflow, ready for compilation.
/// This is the target structure for any caller-side format conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub workflow_id: WorkflowId,
    pub workflow_name: String,
    pub source: Source,
    pub destinations: Vec<DestinationOutput>,
    pub parameter_sections: Vec<ParameterSection>,
    pub etl: EtlConfig,
}

impl WorkflowConfig {
    /// Every parameter of every section, in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameter_sections
            .iter()
            .flat_map(|section| section.parameters.iter())
    }
}

/// Stable identifier of a workflow. Callers use either numeric or string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorkflowId {
    Int(i64),
    Text(String),
}

impl WorkflowId {
    pub fn is_empty(&self) -> bool {
        match self {
            WorkflowId::Int(_) => false,
            WorkflowId::Text(text) => text.trim().is_empty(),
        }
    }
}

impl Default for WorkflowId {
    fn default() -> Self {
        WorkflowId::Text(String::new())
    }
}

impl From<i64> for WorkflowId {
    fn from(id: i64) -> Self {
        WorkflowId::Int(id)
    }
}

impl From<i32> for WorkflowId {
    fn from(id: i32) -> Self {
        WorkflowId::Int(i64::from(id))
    }
}

impl From<&str> for WorkflowId {
    fn from(id: &str) -> Self {
        WorkflowId::Text(id.to_string())
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowId::Int(id) => write!(f, "{}", id),
            WorkflowId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// Where the workflow reads its input from. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    File(FileSource),
    Api(ApiSource),
    /// Declared by the UI but not backed by a loader yet.
    Database,
    /// A kind the compiler does not recognize, kept verbatim.
    Unknown(String),
}

impl Source {
    /// The kind selector used for operation variant lookup.
    pub fn kind(&self) -> &str {
        match self {
            Source::File(_) => "file",
            Source::Api(_) => "api",
            Source::Database => "database",
            Source::Unknown(kind) => kind,
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Unknown(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSource {
    pub input_path: String,
    pub bucket: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSource {
    pub endpoint_url: String,
    pub api_token: Option<String>,
}

/// One output of the workflow; each becomes a save stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationOutput {
    pub id: i64,
    pub name: String,
    pub config: DestinationConfig,
    pub description: String,
    pub is_receipt: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestinationConfig {
    Csv(CsvDestination),
    Api(ApiDestination),
    Database,
    Unknown(String),
}

impl DestinationConfig {
    pub fn kind(&self) -> &str {
        match self {
            DestinationConfig::Csv(_) => "csv",
            DestinationConfig::Api(_) => "api",
            DestinationConfig::Database => "database",
            DestinationConfig::Unknown(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvDestination {
    pub bucket: String,
    pub output_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDestination {
    pub endpoint_url: String,
    pub method: String,
    pub api_token: Option<String>,
}

impl Default for ApiDestination {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            method: "POST".to_string(),
            api_token: None,
        }
    }
}

/// A named group of user-tunable parameters. Grouping only affects generated comments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSection {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: ParameterType,
    pub description: String,
    pub mandatory: bool,
    pub options: Vec<ParameterOption>,
}

/// A selectable value of a `select` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterOption {
    pub label: String,
    pub value: String,
}

/// The declared type of a parameter as the UI names it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterType {
    Text,
    Textbox,
    Numeric,
    Float,
    Integer,
    Date,
    Select,
    Boolean,
    Other(String),
}

impl ParameterType {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterType::Text => "text",
            ParameterType::Textbox => "textbox",
            ParameterType::Numeric => "numeric",
            ParameterType::Float => "float",
            ParameterType::Integer => "integer",
            ParameterType::Date => "date",
            ParameterType::Select => "select",
            ParameterType::Boolean => "boolean",
            ParameterType::Other(name) => name,
        }
    }
}

impl From<&str> for ParameterType {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => ParameterType::Text,
            "textbox" => ParameterType::Textbox,
            "numeric" => ParameterType::Numeric,
            "float" => ParameterType::Float,
            "integer" => ParameterType::Integer,
            "date" => ParameterType::Date,
            "select" => ParameterType::Select,
            "boolean" => ParameterType::Boolean,
            _ => ParameterType::Other(name.to_string()),
        }
    }
}

impl From<String> for ParameterType {
    fn from(name: String) -> Self {
        ParameterType::from(name.as_str())
    }
}

impl From<ParameterType> for String {
    fn from(param_type: ParameterType) -> Self {
        param_type.as_str().to_string()
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing configuration. Only carried through to the generated process stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "processing_type", rename_all = "snake_case")]
pub enum EtlConfig {
    #[default]
    None,
    Aggregation {
        group_by: Vec<String>,
        aggregations: Vec<AggregationSpec>,
    },
    Filter {
        conditions: Vec<FilterCondition>,
    },
    Transformation {
        operations: Vec<TransformStep>,
    },
    Custom {
        logic: String,
    },
}

impl EtlConfig {
    pub fn processing_type(&self) -> &'static str {
        match self {
            EtlConfig::None => "none",
            EtlConfig::Aggregation { .. } => "aggregation",
            EtlConfig::Filter { .. } => "filter",
            EtlConfig::Transformation { .. } => "transformation",
            EtlConfig::Custom { .. } => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSpec {
    pub column: String,
    pub function: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub column: String,
    pub operator: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStep {
    pub operation: String,
    pub column: String,
    #[serde(default)]
    pub args: serde_json::Value,
}
