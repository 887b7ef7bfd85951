//! Common test utilities for building workflow definitions and reading generated pipelines.
use pipewright::prelude::*;
use pipewright::workflow::{
    ApiDestination, ApiSource, CsvDestination, FileSource, ParameterOption,
};

/// A file source reading `uploads/input.csv` from the `raw` bucket.
#[allow(dead_code)]
pub fn file_source() -> Source {
    Source::File(FileSource {
        input_path: "s3://raw/uploads/input.csv".to_string(),
        bucket: "raw".to_string(),
    })
}

#[allow(dead_code)]
pub fn api_source(token: Option<&str>) -> Source {
    Source::Api(ApiSource {
        endpoint_url: "https://api.example.com/orders".to_string(),
        api_token: token.map(str::to_string),
    })
}

/// Builds a destination of any kind with a default description.
#[allow(dead_code)]
pub fn destination(id: i64, name: &str, config: DestinationConfig) -> DestinationOutput {
    DestinationOutput {
        id,
        name: name.to_string(),
        config,
        description: String::new(),
        is_receipt: false,
    }
}

#[allow(dead_code)]
pub fn csv_destination(id: i64, name: &str) -> DestinationOutput {
    destination(
        id,
        name,
        DestinationConfig::Csv(CsvDestination {
            bucket: "curated".to_string(),
            output_path: format!("exports/{}.csv", name),
        }),
    )
}

#[allow(dead_code)]
pub fn api_destination(id: i64, name: &str) -> DestinationOutput {
    destination(
        id,
        name,
        DestinationConfig::Api(ApiDestination {
            endpoint_url: "https://api.example.com/ingest".to_string(),
            method: "put".to_string(),
            api_token: Some("secret".to_string()),
        }),
    )
}

#[allow(dead_code)]
pub fn parameter(name: &str, param_type: &str, mandatory: bool) -> Parameter {
    Parameter {
        name: name.to_string(),
        param_type: ParameterType::from(param_type),
        description: String::new(),
        mandatory,
        options: Vec::new(),
    }
}

#[allow(dead_code)]
pub fn select_parameter(name: &str, values: &[&str]) -> Parameter {
    Parameter {
        options: values
            .iter()
            .map(|v| ParameterOption {
                label: v.to_uppercase(),
                value: v.to_string(),
            })
            .collect(),
        ..parameter(name, "select", true)
    }
}

#[allow(dead_code)]
pub fn section(name: &str, parameters: Vec<Parameter>) -> ParameterSection {
    ParameterSection {
        name: name.to_string(),
        parameters,
    }
}

#[allow(dead_code)]
pub fn workflow(
    id: impl Into<WorkflowId>,
    source: Source,
    destinations: Vec<DestinationOutput>,
    parameter_sections: Vec<ParameterSection>,
) -> WorkflowConfig {
    WorkflowConfig {
        workflow_id: id.into(),
        workflow_name: "Sales Report".to_string(),
        source,
        destinations,
        parameter_sections,
        etl: EtlConfig::None,
    }
}

/// Workflow 42: file source, one CSV destination `primary_output`, no parameters.
#[allow(dead_code)]
pub fn create_file_to_csv_workflow() -> WorkflowConfig {
    workflow(
        42,
        file_source(),
        vec![csv_destination(1, "primary_output")],
        Vec::new(),
    )
}

/// Workflow 7: API source and API destination only.
#[allow(dead_code)]
pub fn create_api_only_workflow() -> WorkflowConfig {
    workflow(
        7,
        api_source(Some("token")),
        vec![api_destination(1, "sink")],
        Vec::new(),
    )
}

/// A UI wizard payload in the camelCase shape the frontend submits.
#[allow(dead_code)]
pub fn sample_ui_json() -> &'static str {
    r#"{
        "workflowId": 42,
        "workflowName": "Sales Report",
        "sourceType": "file",
        "sourceConfig": {
            "inputPath": "s3://raw/uploads/sales.xlsx",
            "bucket": "raw",
            "endpointUrl": "https://unused.example.com",
            "apiToken": "leaked-if-kept"
        },
        "destinationOutputs": [
            {
                "id": 1,
                "name": "Primary Output",
                "type": "csv",
                "config": {"bucket": "curated", "outputPath": "exports/sales.csv", "endpointUrl": "https://unused.example.com"},
                "description": "Cleaned sales export",
                "isReceipt": false
            },
            {
                "id": 2,
                "name": "Receipt",
                "type": "api",
                "config": {"endpointUrl": "https://api.example.com/receipts", "method": "post", "bucket": "unused"},
                "description": "",
                "isReceipt": true
            }
        ],
        "parameterSections": [
            {
                "name": "Filters",
                "parameters": [
                    {"name": "threshold", "type": "integer", "description": "Minimum amount", "mandatory": true, "options": []},
                    {"name": "Region", "type": "select", "description": "", "mandatory": false,
                     "options": [{"label": "North", "value": "north"}, {"label": "Code", "value": 7}]}
                ]
            }
        ],
        "etlConfig": {
            "processingType": "aggregation",
            "groupBy": ["region"],
            "aggregations": [{"column": "amount", "function": "sum"}]
        }
    }"#
}

/// One `@op` declaration read back from generated pipeline source.
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct OpSchema {
    pub name: String,
    pub keys: Vec<String>,
    /// `(key, declaration)` with the declaration being the `Field(...)` text.
    pub fields: Vec<(String, String)>,
    pub resource_keys: Option<String>,
}

/// Reads the name and `config_schema` keys of every `@op(...)` block.
#[allow(dead_code)]
pub fn parse_op_schemas(source: &str) -> Vec<OpSchema> {
    let mut schemas = Vec::new();
    let mut current: Option<OpSchema> = None;
    let mut in_schema = false;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed == "@op(" {
            current = Some(OpSchema {
                name: String::new(),
                keys: Vec::new(),
                fields: Vec::new(),
                resource_keys: None,
            });
            continue;
        }
        let Some(op) = current.as_mut() else {
            continue;
        };

        if in_schema {
            if trimmed == "}," {
                in_schema = false;
            } else if let Some((key, declaration)) = trimmed.split_once(": Field(") {
                let key = key.trim_matches('"').to_string();
                op.keys.push(key.clone());
                op.fields.push((key, format!("Field({}", declaration)));
            }
        } else if let Some(name) = trimmed.strip_prefix("name=\"") {
            op.name = name.trim_end_matches(',').trim_end_matches('"').to_string();
        } else if trimmed == "config_schema={" {
            in_schema = true;
        } else if let Some(keys) = trimmed.strip_prefix("required_resource_keys=") {
            op.resource_keys = Some(keys.trim_end_matches(',').to_string());
        } else if trimmed == ")" {
            if let Some(done) = current.take() {
                schemas.push(done);
            }
        }
    }
    schemas
}

/// Finds one parsed op by name, panicking with the available names otherwise.
#[allow(dead_code)]
pub fn find_op<'a>(schemas: &'a [OpSchema], name: &str) -> &'a OpSchema {
    schemas.iter().find(|s| s.name == name).unwrap_or_else(|| {
        panic!(
            "operation '{}' not found, have: {:?}",
            name,
            schemas.iter().map(|s| &s.name).collect::<Vec<_>>()
        )
    })
}

/// The keys of one operation in the run-config template, in template order.
#[allow(dead_code)]
pub fn template_keys(compiled: &CompiledPipeline, op: &str) -> Vec<String> {
    compiled
        .run_config
        .operation(op)
        .map(|holes| holes.keys().cloned().collect())
        .unwrap_or_default()
}
