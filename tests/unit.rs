//! Unit tests for the lookup tables, identifier rules and the source writer.
mod common;
use pipewright::codegen::{SourceWriter, py_default, py_literal, py_str};
use pipewright::compiler::naming::{
    disambiguate, env_var_name, placeholder, sanitize_identifier, save_operation_name,
    workflow_token,
};
use pipewright::mapper::{destination_variant, operation_variant, schema_field_type, source_variant};
use pipewright::workflow::{CsvDestination, FileSource};
use pipewright::plan::DefaultValue;
use pipewright::prelude::*;
use serde_json::json;

#[test]
fn test_schema_field_type_table() {
    let cases = [
        ("integer", FieldType::Integer),
        ("numeric", FieldType::Float),
        ("float", FieldType::Float),
        ("boolean", FieldType::Boolean),
        ("text", FieldType::String),
        ("textbox", FieldType::String),
        ("date", FieldType::String),
        ("select", FieldType::String),
        ("unknown-value", FieldType::String),
        ("", FieldType::String),
    ];
    for (name, expected) in cases {
        assert_eq!(schema_field_type(&ParameterType::from(name)), expected, "{}", name);
    }
}

#[test]
fn test_parameter_type_parsing_is_case_insensitive() {
    assert_eq!(ParameterType::from(" Integer "), ParameterType::Integer);
    assert_eq!(ParameterType::from("BOOLEAN"), ParameterType::Boolean);
    assert_eq!(
        ParameterType::from("Decimal"),
        ParameterType::Other("Decimal".to_string())
    );
    assert_eq!(ParameterType::Select.to_string(), "select");
}

#[test]
fn test_operation_variant_table() {
    assert_eq!(operation_variant("file", Role::Source), OperationVariant::FileLoad);
    assert_eq!(operation_variant(" API ", Role::Source), OperationVariant::ApiLoad);
    assert_eq!(operation_variant("database", Role::Source), OperationVariant::PlaceholderLoad);
    assert_eq!(operation_variant("csv", Role::Source), OperationVariant::PlaceholderLoad);
    assert_eq!(operation_variant("", Role::Source), OperationVariant::PlaceholderLoad);

    assert_eq!(operation_variant("CSV", Role::Destination), OperationVariant::CsvSave);
    assert_eq!(operation_variant("api", Role::Destination), OperationVariant::ApiSave);
    assert_eq!(operation_variant("file", Role::Destination), OperationVariant::PlaceholderSave);
    assert_eq!(
        operation_variant("unknown-value", Role::Destination),
        OperationVariant::PlaceholderSave
    );
}

#[test]
fn test_configured_variants_follow_the_tag() {
    assert_eq!(
        source_variant(&Source::File(FileSource::default())),
        OperationVariant::FileLoad
    );
    assert_eq!(source_variant(&Source::Unknown("file".to_string())), OperationVariant::PlaceholderLoad);
    assert_eq!(source_variant(&Source::Unknown("API".to_string())), OperationVariant::PlaceholderLoad);
    assert_eq!(source_variant(&Source::Database), OperationVariant::PlaceholderLoad);

    assert_eq!(
        destination_variant(&DestinationConfig::Csv(CsvDestination::default())),
        OperationVariant::CsvSave
    );
    assert_eq!(
        destination_variant(&DestinationConfig::Unknown("csv".to_string())),
        OperationVariant::PlaceholderSave
    );
}

#[test]
fn test_variant_roles() {
    assert_eq!(OperationVariant::ApiLoad.role(), Role::Source);
    assert_eq!(OperationVariant::ApiSave.role(), Role::Destination);
    assert!(OperationVariant::PlaceholderLoad.is_placeholder());
    assert!(!OperationVariant::CsvSave.is_placeholder());
}

#[test]
fn test_field_type_python_tokens() {
    assert_eq!(FieldType::Integer.python_type(), "int");
    assert_eq!(FieldType::Float.python_type(), "float");
    assert_eq!(FieldType::Boolean.python_type(), "bool");
    assert_eq!(FieldType::String.python_type(), "str");
    assert_eq!(FieldType::Float.example_value(), json!(0.0));
}

#[test]
fn test_sanitize_identifier() {
    assert_eq!(sanitize_identifier("Primary Output-2!"), "primaryoutput2");
    assert_eq!(sanitize_identifier("already_ok"), "already_ok");
    assert_eq!(sanitize_identifier("Ünïcode"), "ncode");
    assert_eq!(sanitize_identifier("***"), "");
}

#[test]
fn test_workflow_tokens() {
    assert_eq!(workflow_token(&WorkflowId::from(42)), "42");
    assert_eq!(workflow_token(&WorkflowId::from(-5)), "m5");
    assert_eq!(workflow_token(&WorkflowId::from("WF-Orders 1")), "wforders1");
    assert_eq!(workflow_token(&WorkflowId::default()), "");
}

#[test]
fn test_save_operation_names() {
    assert_eq!(save_operation_name("csv", "primary_output", 1, "42"), "save_csv_primary_output_42");
    assert_eq!(save_operation_name("", "x", 1, "42"), "save_default_x_42");
    assert_eq!(save_operation_name("api", "", 7, "42"), "save_api_output_7_42");
    assert_eq!(save_operation_name("api", "", -7, "42"), "save_api_output_m7_42");
}

#[test]
fn test_disambiguate_only_touches_collisions() {
    let names = disambiguate(vec![
        ("save_csv_a_1".to_string(), 10),
        ("save_csv_b_1".to_string(), 11),
        ("save_csv_a_1".to_string(), 12),
    ]);
    assert_eq!(names, vec!["save_csv_a_1_10", "save_csv_b_1", "save_csv_a_1_12"]);
}

#[test]
fn test_disambiguate_duplicate_ids_uses_position() {
    let names = disambiguate(vec![
        ("save_api_out_1".to_string(), 4),
        ("save_api_out_1".to_string(), 4),
        ("save_api_out_1".to_string(), 4),
    ]);
    assert_eq!(
        names,
        vec!["save_api_out_1_4", "save_api_out_1_4_2", "save_api_out_1_4_3"]
    );
}

#[test]
fn test_env_var_and_placeholder_tokens() {
    assert_eq!(env_var_name("save_api_out_1", "api_token"), "SAVE_API_OUT_1_API_TOKEN");
    assert_eq!(placeholder("load_input_1", "bucket"), "{{load_input_1.bucket}}");
    assert_eq!(placeholder("resources.s3", "region_name"), "{{resources.s3.region_name}}");
}

#[test]
fn test_python_literals() {
    assert_eq!(py_str("say \"hi\"\n"), r#""say \"hi\"\n""#);
    assert_eq!(py_literal(&json!(null)), "None");
    assert_eq!(py_literal(&json!(true)), "True");
    assert_eq!(py_literal(&json!([1, "a", false])), r#"[1, "a", False]"#);
    assert_eq!(py_literal(&json!({"k": null})), r#"{"k": None}"#);
    assert_eq!(
        py_default(&DefaultValue::Env("API_TOKEN".to_string())),
        r#"{"env": "API_TOKEN"}"#
    );
}

#[test]
fn test_source_writer_indentation() {
    let mut out = SourceWriter::new();
    out.block("def f():", |out| {
        out.line("x = 1");
        out.blank();
        out.block("if x:", |out| out.line("return x"));
    });
    out.line("f()");
    assert_eq!(
        out.finish(),
        "def f():\n    x = 1\n\n    if x:\n        return x\nf()\n"
    );
}
