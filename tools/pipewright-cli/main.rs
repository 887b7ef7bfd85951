use clap::Parser;
use pipewright::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Compiles UI workflow definitions into pipeline modules and run-config templates
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow JSON file
    workflow_path: Option<String>,

    /// Directory the pipeline module and run-config template are written to
    #[arg(short, long, default_value = "generated")]
    out_dir: PathBuf,

    /// Abort when validation reports an error
    #[arg(long)]
    strict: bool,

    /// Also save the compiled pipeline as a bincode artifact at this path
    #[arg(long)]
    artifact: Option<PathBuf>,

    /// Print the generated module and template to stdout instead of only writing them
    #[arg(long)]
    print: bool,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Settings for one compilation run, whichever mode collected them.
struct RunOptions {
    workflow_path: String,
    out_dir: PathBuf,
    strict: bool,
    artifact: Option<PathBuf>,
    print: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = if cli.human {
        run_interactive()
    } else {
        run_non_interactive(cli)
    };
    run_compilation(options);
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();
}

fn run_compilation(options: RunOptions) {
    let total_start = Instant::now();

    // --- 1. Loading and Conversion ---
    let json = fs::read_to_string(&options.workflow_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read workflow file '{}': {}",
            options.workflow_path, e
        ))
    });
    let workflow = UiWorkflow::from_json(&json)
        .and_then(IntoWorkflow::into_workflow)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert workflow: {}", e)));
    debug!(path = %options.workflow_path, "Loaded workflow");

    let compiler = Compiler::new(workflow);

    // --- 2. Diagnostics ---
    let diagnostics = compiler.validate();
    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic);
    }
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    if options.strict && errors > 0 {
        exit_with_error(&format!(
            "Validation reported {} error(s); not generating in strict mode",
            errors
        ));
    }

    // --- 3. Compilation ---
    let compile_start = Instant::now();
    let compiled = compiler.compile();
    let compile_duration = compile_start.elapsed();
    info!(
        job = %compiled.job_name,
        operations = compiled.operations.len(),
        "Compilation finished in {:?}",
        compile_duration
    );

    // --- 4. Output ---
    let (source_path, template_path) = compiled
        .write_to_dir(&options.out_dir)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write artifacts: {}", e)));
    println!("Pipeline module:      {}", source_path.display());
    println!("Run-config template:  {}", template_path.display());

    if let Some(artifact_path) = &options.artifact {
        compiled
            .save(artifact_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save artifact: {}", e)));
        println!("Compiled artifact:    {}", artifact_path.display());
    }

    if options.print {
        let template = compiled
            .run_config
            .to_json_pretty()
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to render template: {}", e)));
        println!("\n{}", compiled.pipeline_source);
        println!("{}", template);
    }

    println!("\n--- Summary ---");
    println!("Job:                  {}", compiled.job_name);
    println!("Operations:           {}", compiled.operations.join(", "));
    println!("Placeholders:         {}", compiled.run_config.placeholders().len());
    println!(
        "Diagnostics:          {} error(s), {} warning(s)",
        errors,
        diagnostics.len() - errors
    );
    println!("Total Execution:      {:?}", total_start.elapsed());
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(cli: Cli) -> RunOptions {
    let workflow_path = cli.workflow_path.unwrap_or_else(|| {
        exit_with_error("Workflow path is required in non-interactive mode.");
    });
    RunOptions {
        workflow_path,
        out_dir: cli.out_dir,
        strict: cli.strict,
        artifact: cli.artifact,
        print: cli.print,
    }
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive() -> RunOptions {
    println!("--- Pipewright Interactive Mode ---");

    let workflow_path = prompt_for_input("Enter workflow path", Some("data/workflow.json"));
    let out_dir = prompt_for_input("Enter output directory", Some("generated"));
    let artifact = prompt_for_input("Enter artifact path (optional)", None);

    let strict = loop {
        let choice = prompt_for_input("Abort on validation errors? (y/n)", Some("n"));
        match choice.to_ascii_lowercase().as_str() {
            "y" | "yes" => break true,
            "n" | "no" => break false,
            _ => println!("Invalid choice. Please enter y or n."),
        }
    };

    RunOptions {
        workflow_path,
        out_dir: PathBuf::from(out_dir),
        strict,
        artifact: if artifact.is_empty() {
            None
        } else {
            Some(PathBuf::from(artifact))
        },
        print: false,
    }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or(String::new(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to flush stdout: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read input: {}", e));
    }

    let trimmed = line.trim().to_string();
    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
