//! The process stage: wires the workflow's parameters into scope and passes the data through.

use super::PythonImport;
use crate::codegen::{SourceWriter, py_str};
use crate::mapper::FieldType;
use crate::plan::{ConfigField, OperationSpec, Stage};
use crate::workflow::{EtlConfig, Parameter, ParameterType};
use itertools::Itertools;
use tracing::warn;

/// Names the generated body already uses; parameters with these keys stay in `params` only.
const RESERVED_NAMES: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield", "context", "loaded", "params", "data", "temp_file", "etl_config", "json",
    "os", "pd", "dict", "len", "sorted", "str", "int", "float", "bool", "list", "type",
];

/// Builds the schema field for one parameter.
///
/// `field_type` comes from the mapper; the literal default is derived from it,
/// except that dates get an ISO example and selects default to their first option.
pub fn parameter_field(key: &str, parameter: &Parameter, field_type: FieldType) -> ConfigField {
    let description = if parameter.description.trim().is_empty() {
        format!("Workflow parameter '{}'", parameter.name)
    } else {
        parameter.description.clone()
    };
    let field = if parameter.mandatory {
        ConfigField::required(key, field_type, &description)
    } else {
        ConfigField::optional(key, field_type, &description)
    };

    match (&parameter.param_type, field_type) {
        (ParameterType::Select, FieldType::String) => match parameter.options.first() {
            Some(option) => field.with_default(option.value.as_str()),
            None => field,
        },
        (ParameterType::Date, FieldType::String) => field.with_default("1970-01-01"),
        _ => field,
    }
}

pub fn imports(op: &OperationSpec) -> Vec<PythonImport> {
    let mut imports = Vec::new();
    if let Stage::Process {
        etl,
        cleanup_temp_file,
        ..
    } = &op.stage
    {
        if *etl != EtlConfig::None {
            imports.push(PythonImport::Json);
        }
        if *cleanup_temp_file {
            imports.push(PythonImport::Os);
        }
    }
    imports
}

fn is_bindable(key: &str) -> bool {
    key.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && !RESERVED_NAMES.contains(&key)
}

fn single_line(text: &str) -> String {
    text.split_whitespace().join(" ")
}

fn summarize_etl(etl: &EtlConfig) -> Vec<String> {
    let mut lines = vec![format!("Processing type: {}", etl.processing_type())];
    match etl {
        EtlConfig::None => {}
        EtlConfig::Aggregation {
            group_by,
            aggregations,
        } => {
            if !group_by.is_empty() {
                lines.push(format!("group by: {}", group_by.iter().join(", ")));
            }
            if !aggregations.is_empty() {
                lines.push(format!(
                    "aggregate: {}",
                    aggregations
                        .iter()
                        .map(|a| format!("{}({})", a.function, a.column))
                        .join(", ")
                ));
            }
        }
        EtlConfig::Filter { conditions } => {
            for condition in conditions {
                lines.push(format!(
                    "where: {} {} {}",
                    condition.column, condition.operator, condition.value
                ));
            }
        }
        EtlConfig::Transformation { operations } => {
            for step in operations {
                lines.push(format!("step: {}({})", step.operation, step.column));
            }
        }
        EtlConfig::Custom { logic } => {
            lines.push(format!(
                "custom logic: {} line(s), available as etl_config[\"logic\"]",
                logic.lines().count()
            ));
        }
    }
    lines.into_iter().map(|line| single_line(&line)).collect()
}

/// Writes the process stage body.
pub fn render_body(op: &OperationSpec, out: &mut SourceWriter) {
    let Stage::Process {
        etl,
        sections,
        cleanup_temp_file,
    } = &op.stage
    else {
        return;
    };

    out.line("params = dict(context.op_config)");
    for (section, keys) in sections {
        if keys.is_empty() {
            continue;
        }
        if section.trim().is_empty() {
            out.line("# Parameters");
        } else {
            out.line(format!("# {}", single_line(section)));
        }
        for key in keys.iter().filter(|key| is_bindable(key)) {
            out.line(format!("{} = params.get({})", key, py_str(key)));
        }
    }

    if *etl != EtlConfig::None {
        match serde_json::to_string(etl) {
            Ok(payload) => out.line(format!("etl_config = json.loads({})", py_str(&payload))),
            Err(e) => {
                warn!(operation = %op.name, error = %e, "Could not embed ETL configuration");
                out.line("etl_config = {}");
            }
        }
    }

    let process = |out: &mut SourceWriter| {
        out.line(r#"data = loaded["data"].copy()"#);
        for line in summarize_etl(etl) {
            out.line(format!("# {}", line));
        }
        out.line(r#"context.log.info(f"Processing {len(data)} rows with parameters {sorted(params)}")"#);
        out.line(r#"return {"processed_data": data, "source_path": loaded["source_path"]}"#);
    };

    if *cleanup_temp_file {
        out.line(r#"temp_file = loaded.get("temp_file")"#);
        out.block("try:", process);
        out.block("finally:", |out| {
            out.block("if temp_file and os.path.exists(temp_file):", |out| {
                out.line("os.remove(temp_file)");
            });
        });
    } else {
        process(out);
    }
}
