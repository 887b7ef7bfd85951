use super::writer::{SourceWriter, py_default, py_str};
use crate::mapper::OperationVariant;
use crate::plan::{ConfigField, OperationSpec, PipelinePlan, Stage};
use crate::stages::{self, PythonImport, StageTemplate, process};
use ahash::AHashMap;
use itertools::Itertools;
use std::collections::BTreeSet;

/// Renders the pipeline module for a plan.
///
/// Layout: header comment, imports, one `@op` per operation in wiring order,
/// then the `@job` that wires them and carries the default run config.
pub fn render_pipeline(
    plan: &PipelinePlan,
    templates: &AHashMap<OperationVariant, Box<dyn StageTemplate>>,
) -> String {
    let mut out = SourceWriter::new();

    out.line(format!("# Pipeline for {}.", plan.description.split_whitespace().join(" ")));
    out.line("# Generated by pipewright; regenerate from the workflow definition instead of editing.");
    out.blank();
    render_imports(plan, templates, &mut out);

    for op in plan.operations() {
        out.blank();
        out.blank();
        render_operation(op, templates, &mut out);
    }

    out.blank();
    out.blank();
    render_job(plan, &mut out);
    out.finish()
}

fn collect_imports(
    plan: &PipelinePlan,
    templates: &AHashMap<OperationVariant, Box<dyn StageTemplate>>,
) -> BTreeSet<PythonImport> {
    let mut imports: BTreeSet<PythonImport> = BTreeSet::new();
    // The load and process stages always hand a DataFrame around.
    imports.insert(PythonImport::Pandas);
    for op in plan.operations() {
        match op.variant() {
            Some(variant) => stages::with_template(templates, variant, |template| {
                imports.extend(template.imports().iter().copied())
            }),
            None => imports.extend(process::imports(op)),
        }
    }
    imports
}

fn render_imports(
    plan: &PipelinePlan,
    templates: &AHashMap<OperationVariant, Box<dyn StageTemplate>>,
    out: &mut SourceWriter,
) {
    let imports = collect_imports(plan, templates);
    let (stdlib, third_party): (Vec<PythonImport>, Vec<PythonImport>) =
        imports.into_iter().partition(|import| import.is_stdlib());

    if !stdlib.is_empty() {
        for import in stdlib {
            out.line(import.statement());
        }
        out.blank();
    }
    for import in third_party {
        out.line(import.statement());
    }

    let mut dagster = vec!["Field", "RetryPolicy"];
    if plan.has_secrets() {
        dagster.push("StringSource");
    }
    dagster.extend(["job", "op"]);
    out.line(format!("from dagster import {}", dagster.join(", ")));

    if let Some(resource) = &plan.resource {
        out.line(format!(
            "from {} import {}",
            resource.module, resource.definition
        ));
    }
}

fn render_field_declaration(field: &ConfigField) -> String {
    let dagster_type = if field.secret {
        "StringSource"
    } else {
        field.field_type.python_type()
    };
    format!(
        "{}: Field({}, is_required={}, description={}),",
        py_str(&field.key),
        dagster_type,
        if field.required { "True" } else { "False" },
        py_str(&field.description)
    )
}

fn render_dict_entries<'f>(
    fields: impl IntoIterator<Item = &'f ConfigField>,
    out: &mut SourceWriter,
    render: impl Fn(&ConfigField) -> String,
) {
    for field in fields {
        out.line(render(field));
    }
}

fn render_operation(
    op: &OperationSpec,
    templates: &AHashMap<OperationVariant, Box<dyn StageTemplate>>,
    out: &mut SourceWriter,
) {
    out.block("@op(", |out| {
        out.line(format!("name={},", py_str(&op.name)));
        out.line(format!("description={},", py_str(&op.description)));
        if op.fields.is_empty() {
            out.line("config_schema={},");
        } else {
            out.block("config_schema={", |out| {
                render_dict_entries(&op.fields, out, render_field_declaration);
            });
            out.line("},");
        }
        if op.uses_storage {
            out.line(format!(
                "required_resource_keys={{{}}},",
                py_str(crate::plan::STORAGE_RESOURCE_KEY)
            ));
        }
        if !op.tags.is_empty() {
            let tags = op
                .tags
                .iter()
                .map(|(k, v)| format!("{}: {}", py_str(k), py_str(v)))
                .join(", ");
            out.line(format!("tags={{{}}},", tags));
        }
    });
    out.line(")");

    let signature = match &op.stage {
        Stage::Load { .. } => format!("def {}(context) -> dict:", op.name),
        Stage::Process { .. } => format!("def {}(context, loaded: dict) -> dict:", op.name),
        Stage::Save { .. } => format!("def {}(context, processed: dict) -> dict:", op.name),
    };
    out.block(signature, |out| {
        out.line(format!("\"\"\"{}\"\"\"", docstring(&op.description)));
        match op.variant() {
            Some(variant) => stages::with_template(templates, variant, |template| {
                template.render_body(op, out)
            }),
            None => process::render_body(op, out),
        }
    });
}

fn docstring(text: &str) -> String {
    text.split_whitespace()
        .join(" ")
        .replace('\\', "\\\\")
        .replace('"', "'")
}

fn render_config_block(name: &str, fields: &[ConfigField], out: &mut SourceWriter) {
    if fields.is_empty() {
        out.line(format!("{}: {{\"config\": {{}}}},", py_str(name)));
        return;
    }
    out.block(format!("{}: {{", py_str(name)), |out| {
        out.block("\"config\": {", |out| {
            render_dict_entries(fields, out, |field| {
                format!("{}: {},", py_str(&field.key), py_default(&field.default))
            });
        });
        out.line("},");
    });
    out.line("},");
}

fn render_job(plan: &PipelinePlan, out: &mut SourceWriter) {
    out.block("@job(", |out| {
        out.line(format!("name={},", py_str(&plan.job_name)));
        out.line(format!("description={},", py_str(&plan.description)));
        if let Some(resource) = &plan.resource {
            out.line(format!(
                "resource_defs={{{}: {}}},",
                py_str(&resource.key),
                resource.definition
            ));
        }
        out.line(format!(
            "op_retry_policy=RetryPolicy(max_retries={}, delay={}),",
            plan.retry.max_retries, plan.retry.delay_seconds
        ));
        out.line(format!(
            "tags={{\"workflow_id\": {}}},",
            py_str(&plan.workflow_id)
        ));
        out.block("config={", |out| {
            out.block("\"ops\": {", |out| {
                for op in plan.operations() {
                    render_config_block(&op.name, &op.fields, out);
                }
            });
            out.line("},");
            if let Some(resource) = &plan.resource {
                out.block("\"resources\": {", |out| {
                    render_config_block(&resource.key, &resource.fields, out);
                });
                out.line("},");
            }
        });
        out.line("},");
    });
    out.line(")");

    out.block(format!("def {}():", plan.job_name), |out| {
        out.line(format!("loaded = {}()", plan.load.name));
        out.line(format!("processed = {}(loaded)", plan.process.name));
        for save in &plan.saves {
            out.line(format!("{}(processed)", save.name));
        }
    });
}
