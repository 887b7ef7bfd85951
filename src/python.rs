use crate::compiler::Compiler;
use crate::ui::UiWorkflow;
use crate::workflow::{CompiledPipeline, IntoWorkflow};
use pyo3::prelude::*;

/// Compiles a UI workflow into a pipeline module and its run-config template.
///
/// Compilation happens once in the constructor; the accessors return the
/// stored results.
#[pyclass(name = "WorkflowCompiler")]
struct WorkflowCompilerPy {
    compiled: CompiledPipeline,
    diagnostics: Vec<String>,
}

#[pymethods]
impl WorkflowCompilerPy {
    /// Parses and compiles the workflow.
    ///
    /// Args:
    ///     workflow_json (str): The workflow as submitted by the UI wizard.
    ///
    /// Raises:
    ///     ValueError: If the JSON is malformed or the workflow id is neither
    ///         an integer nor a string.
    #[new]
    fn new(workflow_json: &str) -> PyResult<Self> {
        let workflow = UiWorkflow::from_json(workflow_json)
            .and_then(IntoWorkflow::into_workflow)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;

        let compiler = Compiler::new(workflow);
        let diagnostics = compiler.validate().iter().map(|d| d.to_string()).collect();
        Ok(WorkflowCompilerPy {
            compiled: compiler.compile(),
            diagnostics,
        })
    }

    /// The generated Python module source.
    fn pipeline_source(&self) -> String {
        self.compiled.pipeline_source.clone()
    }

    /// The runtime configuration template as a JSON string.
    ///
    /// Raises:
    ///     RuntimeError: If the template cannot be serialized.
    fn run_config_template(&self) -> PyResult<String> {
        self.compiled
            .run_config
            .to_json_pretty()
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
    }

    /// Warnings and errors about the input, one formatted line each.
    fn diagnostics(&self) -> Vec<String> {
        self.diagnostics.clone()
    }
}

/// Python bindings for the pipewright workflow compiler.
#[pymodule]
fn pipewright(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<WorkflowCompilerPy>()?;
    Ok(())
}
