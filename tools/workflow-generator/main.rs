use clap::Parser;
use pipewright::ui::UiWorkflow;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::{Value, json};
use std::fs;

const SOURCE_TYPES: &[&str] = &["file", "api", "database", "ftp"];
const DESTINATION_TYPES: &[&str] = &["csv", "api", "database", "webhook"];
const PARAMETER_TYPES: &[&str] = &[
    "text", "textbox", "numeric", "float", "integer", "date", "select", "boolean", "decimal",
];
const PROCESSING_TYPES: &[&str] = &["none", "aggregation", "filter", "transformation", "custom"];
const COLUMNS: &[&str] = &["region", "amount", "created_at", "customer_id", "status"];

/// A CLI tool to generate random UI workflow definitions for the pipewright compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// Seed for reproducible output; a random seed is used when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// The maximum number of destinations to generate
    #[arg(long, default_value_t = 3)]
    max_destinations: usize,

    /// The maximum number of parameters per section
    #[arg(long, default_value_t = 4)]
    max_parameters: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if cli.max_destinations == 0 {
        eprintln!("Error: --max-destinations must be at least 1");
        std::process::exit(1);
    }

    let workflow = generate_workflow(&mut rng, cli.max_destinations, cli.max_parameters);

    // Fail early if the fixture would not parse back.
    UiWorkflow::from_json(&workflow.to_string())?;

    fs::write(&cli.output, serde_json::to_string_pretty(&workflow)?)?;
    println!(
        "Successfully generated and saved workflow '{}' to '{}'",
        workflow["workflowName"].as_str().unwrap_or_default(),
        cli.output
    );
    Ok(())
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

fn generate_workflow(rng: &mut StdRng, max_destinations: usize, max_parameters: usize) -> Value {
    let id: i64 = rng.random_range(1..10_000);
    let workflow_id = if rng.random_bool(0.5) {
        json!(id)
    } else {
        json!(format!("wf-{}", id))
    };

    let source_type = pick(rng, SOURCE_TYPES);
    let destination_count = rng.random_range(1..=max_destinations);
    let destinations: Vec<Value> = (0..destination_count)
        .map(|index| generate_destination(rng, index as i64 + 1))
        .collect();
    let sections: Vec<Value> = ["Filters", "Options"]
        .iter()
        .map(|name| generate_section(rng, name, max_parameters))
        .collect();

    let api_token = if rng.random_bool(0.5) {
        json!("token-123")
    } else {
        Value::Null
    };

    println!(
        "-> Generated {} source with {} destination(s).",
        source_type, destination_count
    );

    json!({
        "workflowId": workflow_id,
        "workflowName": format!("Generated Workflow {}", id),
        "sourceType": source_type,
        "sourceConfig": {
            "inputPath": format!("s3://raw-data/uploads/{}.csv", id),
            "bucket": "raw-data",
            "endpointUrl": format!("https://api.example.com/workflows/{}/input", id),
            "apiToken": api_token,
        },
        "destinationOutputs": destinations,
        "parameterSections": sections,
        "etlConfig": generate_etl(rng),
    })
}

fn generate_destination(rng: &mut StdRng, id: i64) -> Value {
    let destination_type = pick(rng, DESTINATION_TYPES);
    json!({
        "id": id,
        "name": format!("{} output {}", pick(rng, &["Daily", "Monthly", "Audit"]), id),
        "type": destination_type,
        "config": {
            "bucket": "curated-data",
            "outputPath": format!("exports/output_{}.csv", id),
            "endpointUrl": "https://api.example.com/ingest",
            "method": pick(rng, &["POST", "PUT", "patch"]),
        },
        "description": "",
        "isReceipt": rng.random_bool(0.2),
    })
}

fn generate_section(rng: &mut StdRng, name: &str, max_parameters: usize) -> Value {
    let count = rng.random_range(0..=max_parameters);
    let parameters: Vec<Value> = (0..count)
        .map(|index| {
            let param_type = pick(rng, PARAMETER_TYPES);
            let options = if param_type == "select" {
                json!([
                    {"label": "First", "value": "first"},
                    {"label": "Second", "value": 2},
                ])
            } else {
                json!([])
            };
            json!({
                "name": format!("{} {} {}", name, param_type, index),
                "type": param_type,
                "description": format!("Generated {} parameter", param_type),
                "mandatory": rng.random_bool(0.5),
                "options": options,
            })
        })
        .collect();
    json!({ "name": name, "parameters": parameters })
}

fn generate_etl(rng: &mut StdRng) -> Value {
    let processing_type = pick(rng, PROCESSING_TYPES);
    let column = pick(rng, COLUMNS);
    match processing_type {
        "aggregation" => json!({
            "processingType": processing_type,
            "groupBy": [column],
            "aggregations": [{"column": "amount", "function": "sum"}],
        }),
        "filter" => json!({
            "processingType": processing_type,
            "conditions": [{"column": column, "operator": ">", "value": rng.random_range(0..100_i64)}],
        }),
        "transformation" => json!({
            "processingType": processing_type,
            "operations": [{"operation": "uppercase", "column": column}],
        }),
        "custom" => json!({
            "processingType": processing_type,
            "customLogic": "df = df.dropna()",
        }),
        _ => json!({ "processingType": processing_type }),
    }
}
