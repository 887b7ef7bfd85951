use crate::codegen::RunConfigTemplate;
use crate::error::ArtifactError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The two artifacts produced for one workflow, plus the identifiers they share.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompiledPipeline {
    pub workflow_id: String,
    pub job_name: String,
    /// Operation identifiers in wiring order: load, process, then every save.
    pub operations: Vec<String>,
    pub pipeline_source: String,
    pub run_config: RunConfigTemplate,
}

impl CompiledPipeline {
    /// Saves the compiled pipeline to a file using the bincode format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let bytes = encode_to_vec(self, standard())
            .map_err(|e| ArtifactError::Serialization(e.to_string()))?;
        fs::write(path, bytes).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads a compiled pipeline from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a compiled pipeline from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(pipeline, _)| pipeline) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| ArtifactError::Deserialization(e.to_string()))
    }

    /// Writes `<job>.py` and `<job>_run_config.json` into `dir`, creating it if needed.
    ///
    /// Returns the paths of the pipeline module and the template, in that order.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf), ArtifactError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| ArtifactError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let source_path = dir.join(format!("{}.py", self.job_name));
        let template_path = dir.join(format!("{}_run_config.json", self.job_name));

        let template_json = self
            .run_config
            .to_json_pretty()
            .map_err(|e| ArtifactError::Serialization(e.to_string()))?;

        for (path, contents) in [
            (&source_path, self.pipeline_source.as_str()),
            (&template_path, template_json.as_str()),
        ] {
            fs::write(path, contents).map_err(|source| ArtifactError::Io {
                path: path.display().to_string(),
                source,
            })?;
        }

        Ok((source_path, template_path))
    }
}
