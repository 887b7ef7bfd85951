use crate::compiler::naming::placeholder;
use crate::error::TemplateError;
use crate::plan::{ConfigField, PipelinePlan};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Placeholder key → token map for one operation or resource.
pub type PlaceholderMap = BTreeMap<String, String>;

const RESOURCES_SCOPE: &str = "resources";

/// The runtime configuration template: one placeholder per declared schema key.
///
/// Built from the same `PipelinePlan` as the pipeline source, so its key sets
/// match the `config_schema` declarations operation by operation.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfigTemplate {
    pub ops: BTreeMap<String, PlaceholderMap>,
    /// Empty when the pipeline declares no shared resource.
    pub resources: BTreeMap<String, PlaceholderMap>,
}

fn placeholders_for(scope: &str, fields: &[ConfigField]) -> PlaceholderMap {
    fields
        .iter()
        .map(|field| (field.key.clone(), placeholder(scope, &field.key)))
        .collect()
}

/// Strips the `{{` `}}` delimiters from a token.
fn hole_name(token: &str) -> &str {
    token
        .strip_prefix("{{")
        .and_then(|t| t.strip_suffix("}}"))
        .unwrap_or(token)
}

impl RunConfigTemplate {
    pub fn from_plan(plan: &PipelinePlan) -> Self {
        let ops = plan
            .operations()
            .map(|op| (op.name.clone(), placeholders_for(&op.name, &op.fields)))
            .collect();
        let resources = plan
            .resource
            .iter()
            .map(|resource| {
                let scope = format!("{}.{}", RESOURCES_SCOPE, resource.key);
                (resource.key.clone(), placeholders_for(&scope, &resource.fields))
            })
            .collect();
        Self { ops, resources }
    }

    pub fn operation(&self, name: &str) -> Option<&PlaceholderMap> {
        self.ops.get(name)
    }

    pub fn has_resources(&self) -> bool {
        !self.resources.is_empty()
    }

    /// The template as JSON: operation identifiers at the top level, plus
    /// a `"resources"` entry when a resource is declared.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        for (name, holes) in &self.ops {
            root.insert(name.clone(), string_map(holes));
        }
        if self.has_resources() {
            let resources = self
                .resources
                .iter()
                .map(|(key, holes)| (key.clone(), string_map(holes)))
                .collect();
            root.insert(RESOURCES_SCOPE.to_string(), Value::Object(resources));
        }
        Value::Object(root)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_value())
    }

    /// Every hole name (the token without its braces), operations first.
    pub fn placeholders(&self) -> Vec<String> {
        self.ops
            .values()
            .chain(self.resources.values())
            .flat_map(|holes| holes.values())
            .map(|token| hole_name(token).to_string())
            .collect()
    }

    /// Substitutes concrete values and returns a run config in the orchestrator's
    /// shape: `{"ops": {op: {"config": ..}}, "resources": {key: {"config": ..}}}`.
    ///
    /// `values` is keyed by hole name. A `null` value drops the key (leaving the
    /// job default in force); a hole with no entry at all is an error.
    pub fn fill(&self, values: &BTreeMap<String, Value>) -> Result<Value, TemplateError> {
        let mut missing = Vec::new();
        let mut substitute = |holes: &PlaceholderMap| -> Value {
            let mut config = Map::new();
            for (key, token) in holes {
                let name = hole_name(token);
                match values.get(name) {
                    Some(Value::Null) => {}
                    Some(value) => {
                        config.insert(key.clone(), value.clone());
                    }
                    None => missing.push(name.to_string()),
                }
            }
            let mut wrapper = Map::new();
            wrapper.insert("config".to_string(), Value::Object(config));
            Value::Object(wrapper)
        };

        let ops: Map<String, Value> = self
            .ops
            .iter()
            .map(|(name, holes)| (name.clone(), substitute(holes)))
            .collect();
        let resources: Map<String, Value> = self
            .resources
            .iter()
            .map(|(key, holes)| (key.clone(), substitute(holes)))
            .collect();

        if !missing.is_empty() {
            return Err(TemplateError::MissingValues(missing));
        }

        let mut root = Map::new();
        root.insert("ops".to_string(), Value::Object(ops));
        if !resources.is_empty() {
            root.insert(RESOURCES_SCOPE.to_string(), Value::Object(resources));
        }
        Ok(Value::Object(root))
    }
}

fn string_map(holes: &PlaceholderMap) -> Value {
    Value::Object(
        holes
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}
