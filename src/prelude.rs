//! Prelude module for convenient imports
//!
//! Re-exports the types needed to describe, compile and persist a workflow.
//!
//! # Example
//!
//! ```rust,no_run
//! use pipewright::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/workflow.json")?;
//! let compiled = Compiler::new(UiWorkflow::from_json(&json)?.into_workflow()?).compile();
//!
//! compiled.save("path/to/workflow.bin")?;
//! println!("{}", compiled.run_config.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

// Compilation
pub use crate::compiler::{Compiler, CompilerBuilder};
pub use crate::stages::{StageBinding, StageTemplate};

// Workflow model
pub use crate::workflow::{
    CompiledPipeline, DestinationConfig, DestinationOutput, EtlConfig, IntoWorkflow, Parameter,
    ParameterSection, ParameterType, Source, WorkflowConfig, WorkflowId,
};
pub use crate::ui::UiWorkflow;

// Generated artifacts
pub use crate::codegen::RunConfigTemplate;
pub use crate::mapper::{FieldType, OperationVariant, Role};

// Diagnostics and errors
pub use crate::error::{ArtifactError, TemplateError, WorkflowConversionError};
pub use crate::validation::{Diagnostic, Severity};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
