//! The UI wizard's JSON shape and its translation into `WorkflowConfig`.
//!
//! The wizard sends every variant's fields at once in `sourceConfig` and in
//! each destination's `config`; conversion keeps only the fields of the kind
//! selected by `sourceType` or the destination `type`.

mod types;

pub use types::*;

use crate::error::WorkflowConversionError;
use crate::workflow::{
    AggregationSpec, ApiDestination, ApiSource, CsvDestination, DestinationConfig,
    DestinationOutput, EtlConfig, FileSource, FilterCondition, IntoWorkflow, Parameter,
    ParameterOption, ParameterSection, ParameterType, Source, TransformStep, WorkflowConfig,
    WorkflowId,
};
use serde_json::Value;

impl UiWorkflow {
    pub fn from_json(json: &str) -> Result<Self, WorkflowConversionError> {
        serde_json::from_str(json).map_err(|e| WorkflowConversionError::JsonParseError(e.to_string()))
    }
}

impl IntoWorkflow for UiWorkflow {
    fn into_workflow(self) -> Result<WorkflowConfig, WorkflowConversionError> {
        let workflow_id = convert_workflow_id(&self.workflow_id)?;
        let etl = self.etl_config.into_etl()?;
        let source = self.source_config.into_source(&self.source_type);

        Ok(WorkflowConfig {
            workflow_id,
            workflow_name: self.workflow_name,
            source,
            destinations: self
                .destination_outputs
                .into_iter()
                .map(UiDestination::into_destination)
                .collect(),
            parameter_sections: self
                .parameter_sections
                .into_iter()
                .map(UiParameterSection::into_section)
                .collect(),
            etl,
        })
    }
}

fn convert_workflow_id(value: &Value) -> Result<WorkflowId, WorkflowConversionError> {
    match value {
        Value::Null => Ok(WorkflowId::default()),
        Value::String(text) => Ok(WorkflowId::Text(text.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(WorkflowId::Int)
            .ok_or_else(|| WorkflowConversionError::InvalidWorkflowId(n.to_string())),
        other => Err(WorkflowConversionError::InvalidWorkflowId(other.to_string())),
    }
}

/// Optional text the UI may send as an empty string.
fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

impl UiSourceConfig {
    fn into_source(self, source_type: &str) -> Source {
        match source_type.trim().to_ascii_lowercase().as_str() {
            "file" => Source::File(FileSource {
                input_path: self.input_path,
                bucket: self.bucket,
            }),
            "api" => Source::Api(ApiSource {
                endpoint_url: self.endpoint_url,
                api_token: non_empty(self.api_token),
            }),
            "database" => Source::Database,
            _ => Source::Unknown(source_type.to_string()),
        }
    }
}

impl UiDestination {
    fn into_destination(self) -> DestinationOutput {
        let config = self.config;
        let config = match self.destination_type.trim().to_ascii_lowercase().as_str() {
            "csv" => DestinationConfig::Csv(CsvDestination {
                bucket: config.bucket,
                output_path: config.output_path,
            }),
            "api" => {
                let defaults = ApiDestination::default();
                DestinationConfig::Api(ApiDestination {
                    endpoint_url: config.endpoint_url,
                    method: non_empty(config.method).unwrap_or(defaults.method),
                    api_token: non_empty(config.api_token),
                })
            }
            "database" => DestinationConfig::Database,
            _ => DestinationConfig::Unknown(self.destination_type.clone()),
        };

        DestinationOutput {
            id: self.id,
            name: self.name,
            config,
            description: self.description,
            is_receipt: self.is_receipt,
        }
    }
}

impl UiParameterSection {
    fn into_section(self) -> ParameterSection {
        ParameterSection {
            name: self.name,
            parameters: self
                .parameters
                .into_iter()
                .map(|p| Parameter {
                    name: p.name,
                    param_type: ParameterType::from(p.param_type),
                    description: p.description,
                    mandatory: p.mandatory,
                    options: p
                        .options
                        .into_iter()
                        .map(|o| ParameterOption {
                            label: o.label,
                            value: option_text(o.value),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Strings are kept as-is, everything else is written as JSON text.
fn option_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl UiEtlConfig {
    fn into_etl(self) -> Result<EtlConfig, WorkflowConversionError> {
        let etl = match self.processing_type.trim().to_ascii_lowercase().as_str() {
            "" | "none" => EtlConfig::None,
            "aggregation" => EtlConfig::Aggregation {
                group_by: self.group_by,
                aggregations: self
                    .aggregations
                    .into_iter()
                    .map(|a| AggregationSpec {
                        column: a.column,
                        function: a.function,
                    })
                    .collect(),
            },
            "filter" => EtlConfig::Filter {
                conditions: self
                    .conditions
                    .into_iter()
                    .map(|c| FilterCondition {
                        column: c.column,
                        operator: c.operator,
                        value: c.value,
                    })
                    .collect(),
            },
            "transformation" => EtlConfig::Transformation {
                operations: self
                    .operations
                    .into_iter()
                    .map(|t| TransformStep {
                        operation: t.operation,
                        column: t.column,
                        args: t.args,
                    })
                    .collect(),
            },
            "custom" => EtlConfig::Custom { logic: self.logic },
            other => {
                return Err(WorkflowConversionError::ValidationError(format!(
                    "unknown processing type '{}'",
                    other
                )));
            }
        };
        Ok(etl)
    }
}
