//! The compiler's intermediate representation.
//!
//! A `PipelinePlan` is built once per compilation; the pipeline source and the
//! runtime configuration template are both rendered from it.

pub mod field;
pub mod operation;
pub mod resource;

pub use field::*;
pub use operation::*;
pub use resource::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelinePlan {
    /// The sanitized workflow id, as embedded into every identifier.
    pub workflow_id: String,
    /// The sanitized workflow name.
    pub workflow_label: String,
    pub job_name: String,
    pub description: String,
    pub resource: Option<ResourceSpec>,
    pub load: OperationSpec,
    pub process: OperationSpec,
    pub saves: Vec<OperationSpec>,
    pub retry: RetryPolicy,
}

impl PipelinePlan {
    /// All operations in wiring order: load, process, then each save.
    pub fn operations(&self) -> impl Iterator<Item = &OperationSpec> {
        std::iter::once(&self.load)
            .chain(std::iter::once(&self.process))
            .chain(self.saves.iter())
    }

    pub fn operation(&self, name: &str) -> Option<&OperationSpec> {
        self.operations().find(|op| op.name == name)
    }

    pub fn has_secrets(&self) -> bool {
        self.operations()
            .flat_map(|op| op.fields.iter())
            .chain(self.resource.iter().flat_map(|r| r.fields.iter()))
            .any(|field| field.secret)
    }
}
