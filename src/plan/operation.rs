use super::field::ConfigField;
use crate::mapper::OperationVariant;
use crate::workflow::EtlConfig;

/// A single named unit of work in the generated pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationSpec {
    pub name: String,
    pub description: String,
    pub stage: Stage,
    /// Declared schema keys, in declaration order.
    pub fields: Vec<ConfigField>,
    pub uses_storage: bool,
    pub tags: Vec<(String, String)>,
}

impl OperationSpec {
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn field(&self, key: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// The template variant for load and save stages; `None` for the process stage.
    pub fn variant(&self) -> Option<OperationVariant> {
        match &self.stage {
            Stage::Load { variant, .. } | Stage::Save { variant, .. } => Some(*variant),
            Stage::Process { .. } => None,
        }
    }
}

/// What an operation does, with the stage-specific details its body needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Load {
        variant: OperationVariant,
        source_kind: String,
    },
    Process {
        etl: EtlConfig,
        /// Parameter keys grouped by section name, for the generated comments.
        sections: Vec<(String, Vec<String>)>,
        /// Set when the load stage hands over a temp file that must be removed.
        cleanup_temp_file: bool,
    },
    Save {
        variant: OperationVariant,
        destination_id: i64,
        destination_kind: String,
        is_receipt: bool,
    },
}
