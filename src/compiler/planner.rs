use super::naming;
use super::resolve_parameter_type;
use crate::mapper::{OperationVariant, destination_variant, schema_field_type, source_variant};
use crate::plan::{OperationSpec, PipelinePlan, ResourceSpec, RetryPolicy, Stage};
use crate::stages::{self, StageBinding, StageTemplate, process};
use crate::workflow::{ParameterType, WorkflowConfig};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use tracing::{debug, warn};

/// Responsible for turning a `WorkflowConfig` into the `PipelinePlan` both artifacts are rendered from.
pub(super) struct Planner<'a> {
    config: &'a WorkflowConfig,
    templates: &'a AHashMap<OperationVariant, Box<dyn StageTemplate>>,
    type_mappings: &'a AHashMap<String, ParameterType>,
    workflow: String,
    label: String,
}

impl<'a> Planner<'a> {
    pub(super) fn new(
        config: &'a WorkflowConfig,
        templates: &'a AHashMap<OperationVariant, Box<dyn StageTemplate>>,
        type_mappings: &'a AHashMap<String, ParameterType>,
    ) -> Self {
        Self {
            config,
            templates,
            type_mappings,
            workflow: naming::workflow_token(&config.workflow_id),
            label: naming::sanitize_identifier(&config.workflow_name),
        }
    }

    pub(super) fn plan(&self) -> PipelinePlan {
        let load = self.plan_load();
        let cleanup_temp_file = load.variant() == Some(OperationVariant::FileLoad);
        let process = self.plan_process(cleanup_temp_file);
        let saves = self.plan_saves();

        let resource = if load.uses_storage || saves.iter().any(|op| op.uses_storage) {
            Some(ResourceSpec::object_storage())
        } else {
            None
        };

        // The raw id is opaque text; keep it on one line wherever it is rendered.
        let raw_id = self.config.workflow_id.to_string().split_whitespace().join(" ");
        let description = if self.label.is_empty() {
            format!("Workflow {}", raw_id)
        } else {
            format!("Workflow {} ({})", self.label, raw_id)
        };

        PipelinePlan {
            workflow_id: self.workflow.clone(),
            workflow_label: self.label.clone(),
            job_name: naming::job_name(&self.workflow),
            description,
            resource,
            load,
            process,
            saves,
            retry: RetryPolicy::default(),
        }
    }

    fn plan_load(&self) -> OperationSpec {
        let source = &self.config.source;
        let variant = source_variant(source);
        if variant.is_placeholder() {
            warn!(source_type = source.kind(), "Unrecognized source type, using placeholder loader");
        }

        let name = naming::load_operation_name(&self.workflow);
        let raw_id = self.config.workflow_id.to_string();
        let binding = StageBinding::Source {
            workflow_id: &raw_id,
            source,
        };
        let (fields, uses_storage) = stages::with_template(self.templates, variant, |template| {
            (template.config_fields(&name, &binding), template.uses_storage())
        });

        debug!(operation = %name, ?variant, fields = fields.len(), "Planned load stage");
        OperationSpec {
            description: format!("Load input data for {}", self.subject()),
            stage: Stage::Load {
                variant,
                source_kind: source.kind().to_string(),
            },
            name,
            fields,
            uses_storage,
            tags: Vec::new(),
        }
    }

    fn plan_process(&self, cleanup_temp_file: bool) -> OperationSpec {
        let mut fields = Vec::new();
        let mut sections = Vec::new();
        let mut seen = AHashSet::new();
        let mut position = 0usize;

        for section in &self.config.parameter_sections {
            let mut keys = Vec::new();
            for parameter in &section.parameters {
                position += 1;
                let key = parameter_key(&parameter.name, position);
                if !seen.insert(key.clone()) {
                    warn!(parameter = %parameter.name, key = %key, "Duplicate parameter key, keeping the first declaration");
                    continue;
                }
                let resolved = resolve_parameter_type(&parameter.param_type, self.type_mappings);
                let field_type = schema_field_type(&resolved);
                fields.push(process::parameter_field(&key, parameter, field_type));
                keys.push(key);
            }
            sections.push((section.name.clone(), keys));
        }

        let name = naming::process_operation_name(&self.workflow);
        debug!(operation = %name, fields = fields.len(), "Planned process stage");
        OperationSpec {
            description: format!(
                "Apply {} processing for {}",
                self.config.etl.processing_type(),
                self.subject()
            ),
            stage: Stage::Process {
                etl: self.config.etl.clone(),
                sections,
                cleanup_temp_file,
            },
            name,
            fields,
            uses_storage: false,
            tags: Vec::new(),
        }
    }

    fn plan_saves(&self) -> Vec<OperationSpec> {
        let destinations = &self.config.destinations;
        let names = naming::disambiguate(
            destinations
                .iter()
                .map(|d| {
                    (
                        naming::save_operation_name(d.config.kind(), &d.name, d.id, &self.workflow),
                        d.id,
                    )
                })
                .collect(),
        );

        destinations
            .iter()
            .zip(names)
            .map(|(destination, name)| {
                let kind = destination.config.kind();
                let variant = destination_variant(&destination.config);
                if variant.is_placeholder() {
                    warn!(destination = %destination.name, destination_type = kind, "Unsupported destination type, using placeholder writer");
                }

                let raw_id = self.config.workflow_id.to_string();
                let binding = StageBinding::Destination {
                    workflow_id: &raw_id,
                    destination,
                };
                let (fields, uses_storage) =
                    stages::with_template(self.templates, variant, |template| {
                        (template.config_fields(&name, &binding), template.uses_storage())
                    });

                let description = if destination.description.trim().is_empty() {
                    format!("Save output '{}' as {}", destination.name, kind)
                } else {
                    destination.description.clone()
                };
                let tags = if destination.is_receipt {
                    vec![("is_receipt".to_string(), "true".to_string())]
                } else {
                    Vec::new()
                };

                debug!(operation = %name, ?variant, "Planned save stage");
                OperationSpec {
                    name,
                    description,
                    stage: Stage::Save {
                        variant,
                        destination_id: destination.id,
                        destination_kind: kind.to_string(),
                        is_receipt: destination.is_receipt,
                    },
                    fields,
                    uses_storage,
                    tags,
                }
            })
            .collect()
    }

    fn subject(&self) -> String {
        if self.label.is_empty() {
            format!("workflow {}", self.config.workflow_id)
        } else {
            format!("workflow {}", self.label)
        }
    }
}

/// Configuration key of a parameter; `position` is its 1-based index across all sections.
pub(crate) fn parameter_key(name: &str, position: usize) -> String {
    match naming::sanitize_identifier(name) {
        key if key.is_empty() => format!("param_{}", position),
        key => key,
    }
}
