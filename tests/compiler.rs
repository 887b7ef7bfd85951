//! Tests for compilation: naming, stage selection, schemas and the builder options.
mod common;
use common::*;
use pipewright::codegen::SourceWriter;
use pipewright::plan::{ConfigField, OperationSpec};
use pipewright::prelude::*;
use pipewright::workflow::ParameterOption;

#[test]
fn test_file_to_csv_workflow_scenario() {
    let compiled = Compiler::new(create_file_to_csv_workflow()).compile();

    assert_eq!(compiled.job_name, "workflow_42");
    assert_eq!(
        compiled.operations,
        vec![
            "load_input_42".to_string(),
            "process_data_42".to_string(),
            "save_csv_primary_output_42".to_string(),
        ]
    );

    let source = &compiled.pipeline_source;
    assert!(source.contains("from dagster_aws.s3 import s3_resource"));
    assert!(source.contains(r#"resource_defs={"s3": s3_resource},"#));
    assert!(compiled.run_config.has_resources());

    // Wiring: load -> process -> save.
    assert!(source.contains("def workflow_42():"));
    assert!(source.contains("    loaded = load_input_42()"));
    assert!(source.contains("    processed = process_data_42(loaded)"));
    assert!(source.contains("    save_csv_primary_output_42(processed)"));
}

#[test]
fn test_api_only_workflow_has_no_resource() {
    let compiled = Compiler::new(create_api_only_workflow()).compile();

    let source = &compiled.pipeline_source;
    assert!(!source.contains("s3_resource"));
    assert!(!source.contains("resource_defs"));
    assert!(!source.contains("required_resource_keys"));
    assert!(!compiled.run_config.has_resources());
    assert!(compiled.run_config.to_value().get("resources").is_none());
}

#[test]
fn test_mandatory_integer_parameter_is_required_int() {
    let config = workflow(
        42,
        file_source(),
        vec![csv_destination(1, "primary_output")],
        vec![section("Limits", vec![parameter("threshold", "integer", true)])],
    );
    let compiled = Compiler::new(config).compile();

    let schemas = parse_op_schemas(&compiled.pipeline_source);
    let process = find_op(&schemas, "process_data_42");
    assert_eq!(process.keys, vec!["threshold".to_string()]);
    assert!(process.fields[0].1.starts_with("Field(int, is_required=True"));

    let holes = compiled.run_config.operation("process_data_42").unwrap();
    assert_eq!(holes["threshold"], "{{process_data_42.threshold}}");
}

#[test]
fn test_unknown_source_uses_placeholder_loader() {
    let config = workflow(
        42,
        Source::Unknown("ftp".to_string()),
        vec![csv_destination(1, "primary_output")],
        Vec::new(),
    );
    let compiler = Compiler::new(config);
    let plan = compiler.plan();
    assert_eq!(plan.load.variant(), Some(OperationVariant::PlaceholderLoad));
    assert_eq!(plan.load.field_keys().collect::<Vec<_>>(), vec!["workflow_id"]);

    let compiled = compiler.compile();
    let source = &compiled.pipeline_source;
    assert!(source.contains("No loader for source type 'ftp'"));
    assert!(source.contains(r#"return {"data": pd.DataFrame(), "source_path": ""}"#));
    assert_eq!(template_keys(&compiled, "load_input_42"), vec!["workflow_id"]);
}

#[test]
fn test_compilation_is_deterministic() {
    let config = workflow(
        "wf-9",
        api_source(None),
        vec![
            csv_destination(3, "daily"),
            api_destination(1, "daily"),
            destination(2, "", DestinationConfig::Database),
        ],
        vec![
            section("A", vec![parameter("x", "numeric", false), select_parameter("mode", &["a", "b"])]),
            section("", vec![parameter("when", "date", true)]),
        ],
    );

    let first = Compiler::new(config.clone()).compile();
    let second = Compiler::new(config).compile();
    assert_eq!(first.pipeline_source, second.pipeline_source);
    assert_eq!(
        first.run_config.to_json_pretty().unwrap(),
        second.run_config.to_json_pretty().unwrap()
    );
    assert_eq!(first, second);
}

#[test]
fn test_save_stage_per_destination() {
    let config = workflow(
        5,
        api_source(None),
        vec![
            csv_destination(10, "Monthly Totals"),
            api_destination(11, "crm-sync"),
            destination(12, "archive", DestinationConfig::Unknown("sftp".to_string())),
        ],
        Vec::new(),
    );
    let compiled = Compiler::new(config).compile();
    let schemas = parse_op_schemas(&compiled.pipeline_source);

    let saves: Vec<&str> = schemas
        .iter()
        .map(|s| s.name.as_str())
        .filter(|name| name.starts_with("save_"))
        .collect();
    assert_eq!(
        saves,
        vec![
            "save_csv_monthlytotals_5",
            "save_api_crmsync_5",
            "save_sftp_archive_5",
        ]
    );
}

#[test]
fn test_empty_names_and_kinds_get_defaults() {
    let config = workflow(
        -3,
        Source::Unknown(String::new()),
        vec![destination(-8, "", DestinationConfig::Unknown(String::new()))],
        Vec::new(),
    );
    let compiled = Compiler::new(config).compile();
    assert_eq!(
        compiled.operations,
        vec!["load_input_m3", "process_data_m3", "save_default_output_m8_m3"]
    );
    assert_eq!(compiled.job_name, "workflow_m3");
}

#[test]
fn test_colliding_destination_names_are_disambiguated() {
    let config = workflow(
        42,
        file_source(),
        vec![
            csv_destination(1, "Report"),
            csv_destination(2, "report!"),
            csv_destination(3, "summary"),
        ],
        Vec::new(),
    );
    let compiled = Compiler::new(config).compile();
    assert_eq!(
        &compiled.operations[2..],
        &[
            "save_csv_report_42_1".to_string(),
            "save_csv_report_42_2".to_string(),
            "save_csv_summary_42".to_string(),
        ]
    );
}

#[test]
fn test_duplicate_ids_still_yield_unique_save_names() {
    let config = workflow(
        1,
        api_source(None),
        vec![api_destination(4, "out"), api_destination(4, "out")],
        Vec::new(),
    );
    let compiled = Compiler::new(config).compile();
    assert_eq!(
        &compiled.operations[2..],
        &["save_api_out_1_4".to_string(), "save_api_out_1_4_2".to_string()]
    );
}

#[test]
fn test_duplicate_parameter_keys_keep_first() {
    let config = workflow(
        1,
        api_source(None),
        vec![api_destination(1, "out")],
        vec![
            section("One", vec![parameter("Limit", "integer", true)]),
            section("Two", vec![parameter("limit", "text", false), parameter("***", "text", false)]),
        ],
    );
    let plan = Compiler::new(config).plan();
    let keys: Vec<&str> = plan.process.field_keys().collect();
    assert_eq!(keys, vec!["limit", "param_3"]);
    assert_eq!(plan.process.field("limit").unwrap().field_type, FieldType::Integer);
    assert!(plan.process.field("limit").unwrap().required);
}

#[test]
fn test_select_and_date_defaults() {
    let config = workflow(
        1,
        api_source(None),
        vec![api_destination(1, "out")],
        vec![section(
            "Options",
            vec![select_parameter("mode", &["fast", "slow"]), parameter("start", "date", false)],
        )],
    );
    let compiled = Compiler::new(config).compile();
    let source = &compiled.pipeline_source;
    assert!(source.contains(r#""mode": "fast","#));
    assert!(source.contains(r#""start": "1970-01-01","#));
}

#[test]
fn test_type_mapping_applies_to_custom_types() {
    let config = workflow(
        1,
        api_source(None),
        vec![api_destination(1, "out")],
        vec![section("", vec![parameter("ratio", "Decimal", true)])],
    );

    let unmapped = Compiler::new(config.clone()).plan();
    assert_eq!(unmapped.process.fields[0].field_type, FieldType::String);

    let mapped = Compiler::builder(config)
        .with_type_mapping("decimal", ParameterType::Float)
        .build();
    assert_eq!(mapped.plan().process.fields[0].field_type, FieldType::Float);
    assert!(
        mapped
            .validate()
            .iter()
            .all(|d| d.code() != "unknown-parameter-type")
    );
}

#[test]
fn test_api_fields_and_secret_defaults() {
    let compiled = Compiler::new(create_api_only_workflow()).compile();
    let schemas = parse_op_schemas(&compiled.pipeline_source);

    let load = find_op(&schemas, "load_input_7");
    assert_eq!(load.keys, vec!["workflow_id", "endpoint_url", "api_token"]);
    let (_, token) = &load.fields[2];
    assert!(token.starts_with("Field(StringSource, is_required=False"));

    let save = find_op(&schemas, "save_api_sink_7");
    assert_eq!(save.keys, vec!["endpoint_url", "method", "api_token"]);

    let source = &compiled.pipeline_source;
    assert!(source.contains("from dagster import Field, RetryPolicy, StringSource, job, op"));
    assert!(source.contains(r#""api_token": {"env": "LOAD_INPUT_7_API_TOKEN"},"#));
    assert!(source.contains(r#""method": "PUT","#));
    // The token value itself never reaches the generated module.
    assert!(!source.contains("\"token\""));
}

#[test]
fn test_file_load_cleans_up_temp_file_in_process() {
    let compiled = Compiler::new(create_file_to_csv_workflow()).compile();
    let source = &compiled.pipeline_source;
    assert!(source.contains(r#"temp_file = loaded.get("temp_file")"#));
    assert!(source.contains(
        "    finally:\n        if temp_file and os.path.exists(temp_file):\n            os.remove(temp_file)\n"
    ));

    let api = Compiler::new(create_api_only_workflow()).compile();
    assert!(!api.pipeline_source.contains("temp_file"));
}

#[test]
fn test_receipt_destinations_are_tagged() {
    let mut receipt = api_destination(2, "receipt");
    receipt.is_receipt = true;
    let config = workflow(9, api_source(None), vec![api_destination(1, "main"), receipt], Vec::new());

    let plan = Compiler::new(config).plan();
    assert!(plan.saves[0].tags.is_empty());
    assert_eq!(
        plan.saves[1].tags,
        vec![("is_receipt".to_string(), "true".to_string())]
    );
}

#[test]
fn test_retry_policy_is_fixed() {
    let compiled = Compiler::new(create_file_to_csv_workflow()).compile();
    assert!(
        compiled
            .pipeline_source
            .contains("op_retry_policy=RetryPolicy(max_retries=3, delay=30),")
    );
}

#[test]
fn test_etl_config_is_embedded_as_json() {
    let mut config = create_api_only_workflow();
    config.etl = EtlConfig::Custom {
        logic: "df = df[df.amount > 0]\nreturn df".to_string(),
    };
    let compiled = Compiler::new(config).compile();
    let source = &compiled.pipeline_source;
    assert!(source.contains("import json"));
    assert!(source.contains(r#"etl_config = json.loads("{\"processing_type\":\"custom\""#));
    assert!(source.contains("# Processing type: custom"));
}

/// Writes nothing but a log line, to prove registered templates replace the defaults.
struct AuditSaveTemplate;

impl StageTemplate for AuditSaveTemplate {
    fn variant(&self) -> OperationVariant {
        OperationVariant::PlaceholderSave
    }

    fn config_fields(&self, _op_name: &str, _binding: &StageBinding<'_>) -> Vec<ConfigField> {
        vec![ConfigField::required("table", FieldType::String, "Audit table").with_default("audit_log")]
    }

    fn render_body(&self, _op: &OperationSpec, out: &mut SourceWriter) {
        out.line(r#"context.log.info("audit")"#);
        out.line(r#"return {"output_path": "audit_log", "row_count": 0}"#);
    }
}

#[test]
fn test_custom_template_replaces_default() {
    let config = workflow(
        3,
        api_source(None),
        vec![destination(1, "warehouse", DestinationConfig::Database)],
        Vec::new(),
    );
    let compiled = Compiler::builder(config)
        .with_custom_template(Box::new(AuditSaveTemplate))
        .build()
        .compile();

    assert_eq!(template_keys(&compiled, "save_database_warehouse_3"), vec!["table"]);
    assert!(compiled.pipeline_source.contains(r#"context.log.info("audit")"#));
    assert!(!compiled.pipeline_source.contains("No writer for destination type"));
}

#[test]
fn test_option_values_are_strings() {
    let mut select = select_parameter("level", &[]);
    select.options.push(ParameterOption {
        label: "Three".to_string(),
        value: "3".to_string(),
    });
    let config = workflow(1, api_source(None), vec![api_destination(1, "o")], vec![section("", vec![select])]);
    let plan = Compiler::new(config).plan();
    let field = plan.process.field("level").unwrap();
    assert_eq!(field.field_type, FieldType::String);
    assert_eq!(field.default.to_string(), "\"3\"");
}

#[test]
fn test_multiline_workflow_id_stays_in_header_comment() {
    let mut config = create_api_only_workflow();
    config.workflow_id = WorkflowId::Text("7\nimport os; os.system('x')".to_string());
    let compiled = Compiler::new(config).compile();

    let source = &compiled.pipeline_source;
    assert!(source.lines().next().unwrap().starts_with("# Pipeline for "));
    assert!(source.contains("import os; os.system('x')"));
    for line in source.lines() {
        assert!(!line.starts_with("import os;"), "top-level line from the id: {}", line);
        assert!(!line.trim_start().starts_with("import os;"), "line from the id: {}", line);
    }
}

#[test]
fn test_unknown_kinds_never_select_real_templates() {
    let config = workflow(
        42,
        Source::Unknown("FILE".to_string()),
        vec![
            destination(3, "out", DestinationConfig::Unknown("csv".to_string())),
            destination(4, "hook", DestinationConfig::Unknown(" API ".to_string())),
        ],
        Vec::new(),
    );
    let compiler = Compiler::new(config);
    let plan = compiler.plan();
    assert_eq!(plan.load.variant(), Some(OperationVariant::PlaceholderLoad));
    assert!(
        plan.saves
            .iter()
            .all(|op| op.variant() == Some(OperationVariant::PlaceholderSave))
    );
    assert!(plan.resource.is_none());

    let compiled = compiler.compile();
    assert!(!compiled.run_config.has_resources());
    assert!(!compiled.pipeline_source.contains("s3_resource"));
    assert!(!compiled.pipeline_source.contains("temp_file"));

    let codes: Vec<&str> = compiler.validate().iter().map(Diagnostic::code).collect();
    assert_eq!(
        codes,
        vec!["unknown-source-type", "unknown-destination-type", "unknown-destination-type"]
    );
}

#[test]
fn test_lowercase_constant_names_are_bound_as_locals() {
    let config = workflow(
        42,
        api_source(None),
        vec![api_destination(1, "out")],
        vec![section(
            "Flags",
            vec![
                parameter("true", "boolean", false),
                parameter("none", "text", false),
                parameter("class", "text", false),
            ],
        )],
    );
    let source = Compiler::new(config).compile().pipeline_source;
    assert!(source.contains(r#"    true = params.get("true")"#));
    assert!(source.contains(r#"    none = params.get("none")"#));
    assert!(!source.contains(r#"class = params.get("class")"#));
}
