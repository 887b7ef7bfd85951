use super::definition::WorkflowConfig;
use crate::error::WorkflowConversionError;

/// A trait for caller-side data models that can be converted into a `WorkflowConfig`.
///
/// This is the seam between whatever collects a workflow (a form wizard, a
/// REST payload, a YAML file) and the compiler. Implement it on your own
/// structs to translate them into the canonical model; the compiler never
/// sees the original format.
///
/// # Example
///
/// ```rust,no_run
/// use pipewright::error::WorkflowConversionError;
/// use pipewright::workflow::{
///     CsvDestination, DestinationConfig, DestinationOutput, FileSource, IntoWorkflow,
///     Source, WorkflowConfig,
/// };
///
/// struct MyJob { id: i64, input: String, output: String }
///
/// impl IntoWorkflow for MyJob {
///     fn into_workflow(self) -> Result<WorkflowConfig, WorkflowConversionError> {
///         Ok(WorkflowConfig {
///             workflow_id: self.id.into(),
///             workflow_name: "my_job".to_string(),
///             source: Source::File(FileSource {
///                 input_path: self.input,
///                 bucket: "raw".to_string(),
///             }),
///             destinations: vec![DestinationOutput {
///                 id: 1,
///                 name: "out".to_string(),
///                 config: DestinationConfig::Csv(CsvDestination {
///                     bucket: "curated".to_string(),
///                     output_path: self.output,
///                 }),
///                 description: String::new(),
///                 is_receipt: false,
///             }],
///             ..Default::default()
///         })
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a compiler-ready workflow description.
    fn into_workflow(self) -> Result<WorkflowConfig, WorkflowConversionError>;
}

impl IntoWorkflow for WorkflowConfig {
    fn into_workflow(self) -> Result<WorkflowConfig, WorkflowConversionError> {
        Ok(self)
    }
}
