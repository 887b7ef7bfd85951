use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Complete workflow as the UI wizard submits it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiWorkflow {
    #[serde(default, alias = "workflowId")]
    pub workflow_id: Value,
    #[serde(default, alias = "workflowName")]
    pub workflow_name: String,
    #[serde(default, alias = "sourceType")]
    pub source_type: String,
    #[serde(default, alias = "sourceConfig")]
    pub source_config: UiSourceConfig,
    #[serde(default, alias = "destinationOutputs")]
    pub destination_outputs: Vec<UiDestination>,
    #[serde(default, alias = "parameterSections")]
    pub parameter_sections: Vec<UiParameterSection>,
    #[serde(default, alias = "etlConfig")]
    pub etl_config: UiEtlConfig,
}

/// Source settings carrying the fields of every source kind at once
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiSourceConfig {
    #[serde(default, alias = "inputPath", alias = "filePath")]
    pub input_path: String,
    #[serde(default)]
    pub bucket: String,
    #[serde(default, alias = "endpointUrl", alias = "apiEndpoint")]
    pub endpoint_url: String,
    #[serde(default, alias = "apiToken")]
    pub api_token: Option<String>,
}

/// One entry of `destinationOutputs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiDestination {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub destination_type: String,
    #[serde(default)]
    pub config: UiDestinationConfig,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "isReceipt")]
    pub is_receipt: bool,
}

/// Destination settings carrying the fields of every destination kind at once
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiDestinationConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default, alias = "outputPath")]
    pub output_path: String,
    #[serde(default, alias = "endpointUrl", alias = "apiEndpoint")]
    pub endpoint_url: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default, alias = "apiToken")]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiParameterSection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<UiParameter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub param_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default)]
    pub options: Vec<UiOption>,
}

/// Select option; the UI sends values of any JSON type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiOption {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: Value,
}

/// Processing settings; only the block matching `processingType` is used
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiEtlConfig {
    #[serde(default, alias = "processingType")]
    pub processing_type: String,
    #[serde(default, alias = "groupBy")]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub aggregations: Vec<UiAggregation>,
    #[serde(default, alias = "filterConditions")]
    pub conditions: Vec<UiFilterCondition>,
    #[serde(default, alias = "transformations")]
    pub operations: Vec<UiTransformation>,
    #[serde(default, alias = "customLogic")]
    pub logic: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiAggregation {
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub function: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiFilterCondition {
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiTransformation {
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub column: String,
    #[serde(default)]
    pub args: Value,
}
