use crate::codegen::{RunConfigTemplate, render_pipeline};
use crate::mapper::OperationVariant;
use crate::plan::PipelinePlan;
use crate::stages::{StageTemplate, register_default_templates};
use crate::validation::{self, Diagnostic};
use crate::workflow::{CompiledPipeline, ParameterType, WorkflowConfig};
use ahash::AHashMap;
use tracing::info;

pub mod naming;
mod planner;

pub(crate) use planner::parameter_key;
use planner::Planner;

/// Compiles one workflow into its pipeline source and runtime configuration template.
///
/// Compilation is total: unknown kinds and types fall back to placeholder
/// stages and string fields, so `compile` has no error path.
pub struct Compiler {
    config: WorkflowConfig,
    templates: AHashMap<OperationVariant, Box<dyn StageTemplate>>,
    type_mappings: AHashMap<String, ParameterType>,
}

pub struct CompilerBuilder {
    config: WorkflowConfig,
    templates: AHashMap<OperationVariant, Box<dyn StageTemplate>>,
    type_mappings: AHashMap<String, ParameterType>,
}

impl CompilerBuilder {
    pub fn new(config: WorkflowConfig) -> Self {
        let mut templates: AHashMap<OperationVariant, Box<dyn StageTemplate>> = AHashMap::new();
        register_default_templates(&mut templates);
        Self {
            config,
            templates,
            type_mappings: AHashMap::new(),
        }
    }

    /// Treats a custom parameter type name (e.g. `"decimal"`) as `target`.
    pub fn with_type_mapping(mut self, user_type_name: &str, target: ParameterType) -> Self {
        self.type_mappings
            .insert(user_type_name.trim().to_ascii_lowercase(), target);
        self
    }

    /// Replaces the template used for the template's own variant.
    pub fn with_custom_template(mut self, template: Box<dyn StageTemplate>) -> Self {
        self.templates.insert(template.variant(), template);
        self
    }

    pub fn build(self) -> Compiler {
        Compiler {
            config: self.config,
            templates: self.templates,
            type_mappings: self.type_mappings,
        }
    }
}

impl Compiler {
    pub fn builder(config: WorkflowConfig) -> CompilerBuilder {
        CompilerBuilder::new(config)
    }

    /// A compiler with the built-in templates and no type mappings.
    pub fn new(config: WorkflowConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Builds the intermediate plan both artifacts are rendered from.
    pub fn plan(&self) -> PipelinePlan {
        Planner::new(&self.config, &self.templates, &self.type_mappings).plan()
    }

    pub fn compile(&self) -> CompiledPipeline {
        let plan = self.plan();
        let pipeline_source = render_pipeline(&plan, &self.templates);
        let run_config = RunConfigTemplate::from_plan(&plan);

        info!(
            workflow_id = %plan.workflow_id,
            job = %plan.job_name,
            saves = plan.saves.len(),
            resource = plan.resource.is_some(),
            "Compiled workflow"
        );

        CompiledPipeline {
            workflow_id: plan.workflow_id.clone(),
            job_name: plan.job_name.clone(),
            operations: plan.operations().map(|op| op.name.clone()).collect(),
            pipeline_source,
            run_config,
        }
    }

    /// Reports broken input assumptions, honouring this compiler's type mappings.
    pub fn validate(&self) -> Vec<Diagnostic> {
        validation::validate_with(&self.config, &self.type_mappings)
    }
}

/// Applies a caller-registered mapping to a custom parameter type.
pub(crate) fn resolve_parameter_type(
    param_type: &ParameterType,
    mappings: &AHashMap<String, ParameterType>,
) -> ParameterType {
    match param_type {
        ParameterType::Other(name) => mappings
            .get(&name.trim().to_ascii_lowercase())
            .cloned()
            .unwrap_or_else(|| param_type.clone()),
        _ => param_type.clone(),
    }
}
