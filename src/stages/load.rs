use super::{PythonImport, StageBinding, StageTemplate};
use crate::codegen::{SourceWriter, py_str};
use crate::compiler::naming::env_var_name;
use crate::mapper::{FieldType, OperationVariant};
use crate::plan::{ConfigField, OperationSpec, Stage};
use crate::workflow::Source;

fn workflow_id_field(binding: &StageBinding<'_>) -> ConfigField {
    let workflow_id = match binding {
        StageBinding::Source { workflow_id, .. } | StageBinding::Destination { workflow_id, .. } => {
            *workflow_id
        }
    };
    ConfigField::required(
        "workflow_id",
        FieldType::String,
        "Identifier of the workflow this run belongs to",
    )
    .with_default(workflow_id)
}

fn bound_source<'a>(binding: &StageBinding<'a>) -> Option<&'a Source> {
    match binding {
        StageBinding::Source { source, .. } => Some(*source),
        StageBinding::Destination { .. } => None,
    }
}

/// Downloads a tabular file from object storage into a temp file and parses it.
pub(super) struct FileLoadTemplate;

impl StageTemplate for FileLoadTemplate {
    fn variant(&self) -> OperationVariant {
        OperationVariant::FileLoad
    }

    fn config_fields(&self, _op_name: &str, binding: &StageBinding<'_>) -> Vec<ConfigField> {
        let (input_path, bucket) = match bound_source(binding) {
            Some(Source::File(file)) => (file.input_path.as_str(), file.bucket.as_str()),
            _ => ("", ""),
        };
        vec![
            workflow_id_field(binding),
            ConfigField::required("input_path", FieldType::String, "Object key or s3:// URI of the input file")
                .with_default(input_path),
            ConfigField::required("bucket", FieldType::String, "Bucket holding the input file")
                .with_default(bucket),
        ]
    }

    fn uses_storage(&self) -> bool {
        true
    }

    fn imports(&self) -> &'static [PythonImport] {
        &[PythonImport::Os, PythonImport::Tempfile, PythonImport::Pandas]
    }

    fn render_body(&self, _op: &OperationSpec, out: &mut SourceWriter) {
        out.line("config = context.op_config");
        out.line(r#"bucket = config["bucket"]"#);
        out.line(r#"key = config["input_path"]"#);
        out.line(r#"prefix = f"s3://{bucket}/""#);
        out.block("if key.startswith(prefix):", |out| {
            out.line("key = key[len(prefix):]");
        });
        out.line(r#"key = key.lstrip("/")"#);
        out.line("extension = os.path.splitext(key)[1].lower()");
        out.line(r#"handle = tempfile.NamedTemporaryFile(suffix=extension or ".csv", delete=False)"#);
        out.line("handle.close()");
        out.line("context.resources.s3.download_file(bucket, key, handle.name)");
        out.block(r#"if extension in (".xlsx", ".xls"):"#, |out| {
            out.line("data = pd.read_excel(handle.name)");
        });
        out.block(r#"elif extension == ".json":"#, |out| {
            out.line("data = pd.read_json(handle.name)");
        });
        out.block("else:", |out| {
            out.line("data = pd.read_csv(handle.name)");
        });
        out.line(r#"source_path = f"s3://{bucket}/{key}""#);
        out.line(r#"context.log.info(f"Loaded {len(data)} rows from {source_path}")"#);
        out.line(r#"return {"data": data, "source_path": source_path, "temp_file": handle.name}"#);
    }
}

/// Fetches records from an HTTP endpoint with a single GET.
pub(super) struct ApiLoadTemplate;

impl StageTemplate for ApiLoadTemplate {
    fn variant(&self) -> OperationVariant {
        OperationVariant::ApiLoad
    }

    fn config_fields(&self, op_name: &str, binding: &StageBinding<'_>) -> Vec<ConfigField> {
        let endpoint_url = match bound_source(binding) {
            Some(Source::Api(api)) => api.endpoint_url.as_str(),
            _ => "",
        };
        vec![
            workflow_id_field(binding),
            ConfigField::required("endpoint_url", FieldType::String, "URL the input records are fetched from")
                .with_default(endpoint_url),
            ConfigField::secret(
                "api_token",
                env_var_name(op_name, "api_token"),
                "Bearer token sent with the request, if set",
            ),
        ]
    }

    fn imports(&self) -> &'static [PythonImport] {
        &[PythonImport::Pandas, PythonImport::Requests]
    }

    fn render_body(&self, _op: &OperationSpec, out: &mut SourceWriter) {
        out.line("config = context.op_config");
        out.line(r#"headers = {"Accept": "application/json"}"#);
        out.block(r#"if config.get("api_token"):"#, |out| {
            out.line(r#"headers["Authorization"] = f"Bearer {config['api_token']}""#);
        });
        out.line(r#"response = requests.get(config["endpoint_url"], headers=headers, timeout=60)"#);
        out.line("response.raise_for_status()");
        out.line("payload = response.json()");
        out.line("records = payload if isinstance(payload, list) else [payload]");
        out.line("data = pd.json_normalize(records)");
        out.line(r#"context.log.info(f"Loaded {len(data)} rows from {config['endpoint_url']}")"#);
        out.line(r#"return {"data": data, "source_path": config["endpoint_url"]}"#);
    }
}

/// Inert loader used for source kinds without a real implementation.
pub(super) struct PlaceholderLoadTemplate;

impl StageTemplate for PlaceholderLoadTemplate {
    fn variant(&self) -> OperationVariant {
        OperationVariant::PlaceholderLoad
    }

    fn config_fields(&self, _op_name: &str, binding: &StageBinding<'_>) -> Vec<ConfigField> {
        vec![workflow_id_field(binding)]
    }

    fn render_body(&self, op: &OperationSpec, out: &mut SourceWriter) {
        let kind = match &op.stage {
            Stage::Load { source_kind, .. } => source_kind.as_str(),
            _ => "",
        };
        let message = format!(
            "No loader for source type '{}'; continuing with an empty dataset",
            kind
        );
        out.line(format!("context.log.warning({})", py_str(&message)));
        out.line(r#"return {"data": pd.DataFrame(), "source_path": ""}"#);
    }
}
