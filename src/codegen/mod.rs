pub mod python;
pub mod run_config;
pub mod writer;

pub use python::render_pipeline;
pub use run_config::{PlaceholderMap, RunConfigTemplate};
pub use writer::{SourceWriter, py_default, py_literal, py_str};
