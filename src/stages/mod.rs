//! Operation templates for the load and save stages.
//!
//! Each template declares the configuration schema of its stage and renders
//! the stage body. The planner asks for the schema, the code generator asks
//! for the body, so both artifacts see the same keys.

use crate::codegen::SourceWriter;
use crate::mapper::OperationVariant;
use crate::plan::{ConfigField, OperationSpec};
use crate::workflow::{DestinationOutput, Source};
use ahash::AHashMap;

mod load;
pub mod process;
mod save;

use load::{ApiLoadTemplate, FileLoadTemplate, PlaceholderLoadTemplate};
use save::{ApiSaveTemplate, CsvSaveTemplate, PlaceholderSaveTemplate};

/// The workflow data a template may draw its defaults from.
#[derive(Debug, Clone, Copy)]
pub enum StageBinding<'a> {
    Source {
        workflow_id: &'a str,
        source: &'a Source,
    },
    Destination {
        workflow_id: &'a str,
        destination: &'a DestinationOutput,
    },
}

/// Modules a generated stage body needs at the top of the pipeline file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PythonImport {
    Json,
    Os,
    Tempfile,
    Pandas,
    Requests,
}

impl PythonImport {
    pub fn statement(self) -> &'static str {
        match self {
            PythonImport::Json => "import json",
            PythonImport::Os => "import os",
            PythonImport::Tempfile => "import tempfile",
            PythonImport::Pandas => "import pandas as pd",
            PythonImport::Requests => "import requests",
        }
    }

    /// Whether the module ships with the Python standard library.
    pub fn is_stdlib(self) -> bool {
        matches!(
            self,
            PythonImport::Json | PythonImport::Os | PythonImport::Tempfile
        )
    }
}

/// Defines the contract for generating one load or save stage variant.
///
/// Generated bodies must honour the envelope contract of their role: load
/// stages return `{"data", "source_path"}`, save stages return at least
/// `{"output_path", "row_count"}`.
pub trait StageTemplate: Send + Sync {
    fn variant(&self) -> OperationVariant;

    /// The configuration keys this stage declares, with their job defaults.
    fn config_fields(&self, op_name: &str, binding: &StageBinding<'_>) -> Vec<ConfigField>;

    /// Whether the stage needs the shared object-storage resource.
    fn uses_storage(&self) -> bool {
        false
    }

    fn imports(&self) -> &'static [PythonImport] {
        &[PythonImport::Pandas]
    }

    /// Writes the function body (everything below the `def` line).
    fn render_body(&self, op: &OperationSpec, out: &mut SourceWriter);
}

macro_rules! define_stage_templates {
    ( $( ($struct_name:ident, $variant:path) ),* $(,)? ) => {
        /// Registers the built-in template for every operation variant.
        pub(crate) fn register_default_templates(
            registry: &mut AHashMap<OperationVariant, Box<dyn StageTemplate>>,
        ) {
            $( registry.insert($variant, Box::new($struct_name)); )*
        }

        /// Creates the built-in template for a variant.
        pub fn default_template(variant: OperationVariant) -> Box<dyn StageTemplate> {
            match variant {
                $( $variant => Box::new($struct_name), )*
            }
        }
    };
}

define_stage_templates! {
    (FileLoadTemplate, OperationVariant::FileLoad),
    (ApiLoadTemplate, OperationVariant::ApiLoad),
    (PlaceholderLoadTemplate, OperationVariant::PlaceholderLoad),
    (CsvSaveTemplate, OperationVariant::CsvSave),
    (ApiSaveTemplate, OperationVariant::ApiSave),
    (PlaceholderSaveTemplate, OperationVariant::PlaceholderSave),
}

/// Runs `f` with a variant's registered template, or the built-in one if none is registered.
pub(crate) fn with_template<R>(
    registry: &AHashMap<OperationVariant, Box<dyn StageTemplate>>,
    variant: OperationVariant,
    f: impl FnOnce(&dyn StageTemplate) -> R,
) -> R {
    match registry.get(&variant) {
        Some(template) => f(template.as_ref()),
        None => f(default_template(variant).as_ref()),
    }
}
