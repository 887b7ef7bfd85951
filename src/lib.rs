//! # Pipewright - Workflow to Pipeline Compiler
//!
//! **Pipewright** turns a declarative workflow description (where data comes
//! from, which parameters are user-tunable, how results are processed and
//! where they go) into two artifacts:
//!
//! - a Dagster-style Python module with one load op, one process op, one save
//!   op per destination and a job wiring them together;
//! - a runtime configuration template whose placeholder tokens mirror, key for
//!   key, the configuration schema each op declares.
//!
//! Compilation is a pure function of the input. Unknown source or destination
//! kinds fall back to placeholder stages and unknown parameter types become
//! string fields, so `compile` never fails; `validate` reports those
//! degradations separately.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the workflow**: Build a `WorkflowConfig` directly, parse the UI
//!     wizard's JSON with `UiWorkflow::from_json`, or implement `IntoWorkflow`
//!     for your own format.
//! 2.  **Compile**: Use `Compiler::builder` to register type mappings or custom
//!     stage templates, then call `compile`.
//! 3.  **Persist**: Write the pipeline module and run-config template with
//!     `CompiledPipeline::write_to_dir`, or keep the bincode artifact.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pipewright::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = std::fs::read_to_string("workflow.json")?;
//!     let workflow = UiWorkflow::from_json(&json)?.into_workflow()?;
//!
//!     let compiler = Compiler::builder(workflow)
//!         .with_type_mapping("decimal", ParameterType::Float)
//!         .build();
//!
//!     for diagnostic in compiler.validate() {
//!         eprintln!("{}", diagnostic);
//!     }
//!
//!     let compiled = compiler.compile();
//!     let (source_path, config_path) = compiled.write_to_dir("generated")?;
//!     println!("Wrote {} and {}", source_path.display(), config_path.display());
//!
//!     for hole in compiled.run_config.placeholders() {
//!         println!("needs value for {}", hole);
//!     }
//!     Ok(())
//! }
//! ```

pub mod codegen;
pub mod compiler;
pub mod error;
pub mod mapper;
pub mod plan;
pub mod prelude;
pub mod stages;
pub mod ui;
pub mod validation;
pub mod workflow;

pub use compiler::{Compiler, CompilerBuilder};
pub use workflow::{CompiledPipeline, IntoWorkflow, WorkflowConfig};

#[cfg(feature = "python-bindings")]
mod python;
