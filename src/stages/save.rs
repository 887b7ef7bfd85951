use super::{PythonImport, StageBinding, StageTemplate};
use crate::codegen::{SourceWriter, py_str};
use crate::compiler::naming::env_var_name;
use crate::mapper::{FieldType, OperationVariant};
use crate::plan::{ConfigField, OperationSpec, Stage};
use crate::workflow::{DestinationConfig, DestinationOutput};

fn bound_destination<'a>(binding: &StageBinding<'a>) -> Option<&'a DestinationOutput> {
    match binding {
        StageBinding::Destination { destination, .. } => Some(*destination),
        StageBinding::Source { .. } => None,
    }
}

/// Writes the processed frame to a temp CSV and uploads it to object storage.
pub(super) struct CsvSaveTemplate;

impl StageTemplate for CsvSaveTemplate {
    fn variant(&self) -> OperationVariant {
        OperationVariant::CsvSave
    }

    fn config_fields(&self, _op_name: &str, binding: &StageBinding<'_>) -> Vec<ConfigField> {
        let (bucket, output_path) = match bound_destination(binding).map(|d| &d.config) {
            Some(DestinationConfig::Csv(csv)) => (csv.bucket.as_str(), csv.output_path.as_str()),
            _ => ("", ""),
        };
        vec![
            ConfigField::required("bucket", FieldType::String, "Bucket the CSV is uploaded to")
                .with_default(bucket),
            ConfigField::required("output_path", FieldType::String, "Object key of the uploaded CSV")
                .with_default(output_path),
        ]
    }

    fn uses_storage(&self) -> bool {
        true
    }

    fn imports(&self) -> &'static [PythonImport] {
        &[PythonImport::Os, PythonImport::Tempfile]
    }

    fn render_body(&self, _op: &OperationSpec, out: &mut SourceWriter) {
        out.line("config = context.op_config");
        out.line(r#"data = processed["processed_data"]"#);
        out.line(r#"key = config["output_path"].lstrip("/")"#);
        out.line(r#"handle = tempfile.NamedTemporaryFile(suffix=".csv", delete=False)"#);
        out.line("handle.close()");
        out.block("try:", |out| {
            out.line("data.to_csv(handle.name, index=False)");
            out.line(r#"context.resources.s3.upload_file(handle.name, config["bucket"], key)"#);
        });
        out.block("finally:", |out| {
            out.line("os.remove(handle.name)");
        });
        out.line(r#"output_path = f"s3://{config['bucket']}/{key}""#);
        out.line(r#"context.log.info(f"Wrote {len(data)} rows to {output_path}")"#);
        out.line(r#"return {"output_path": output_path, "row_count": len(data)}"#);
    }
}

/// Submits the processed records to an HTTP endpoint.
pub(super) struct ApiSaveTemplate;

impl StageTemplate for ApiSaveTemplate {
    fn variant(&self) -> OperationVariant {
        OperationVariant::ApiSave
    }

    fn config_fields(&self, op_name: &str, binding: &StageBinding<'_>) -> Vec<ConfigField> {
        let (endpoint_url, method) = match bound_destination(binding).map(|d| &d.config) {
            Some(DestinationConfig::Api(api)) => {
                let method = if api.method.trim().is_empty() {
                    "POST".to_string()
                } else {
                    api.method.trim().to_ascii_uppercase()
                };
                (api.endpoint_url.as_str(), method)
            }
            _ => ("", "POST".to_string()),
        };
        vec![
            ConfigField::required("endpoint_url", FieldType::String, "URL the records are submitted to")
                .with_default(endpoint_url),
            ConfigField::required("method", FieldType::String, "HTTP method used for the submission")
                .with_default(method),
            ConfigField::secret(
                "api_token",
                env_var_name(op_name, "api_token"),
                "Bearer token sent with the request, if set",
            ),
        ]
    }

    fn imports(&self) -> &'static [PythonImport] {
        &[PythonImport::Json, PythonImport::Requests]
    }

    fn render_body(&self, _op: &OperationSpec, out: &mut SourceWriter) {
        out.line("config = context.op_config");
        out.line(r#"data = processed["processed_data"]"#);
        out.line(r#"records = json.loads(data.to_json(orient="records", date_format="iso"))"#);
        out.line(r#"headers = {"Content-Type": "application/json"}"#);
        out.block(r#"if config.get("api_token"):"#, |out| {
            out.line(r#"headers["Authorization"] = f"Bearer {config['api_token']}""#);
        });
        out.block("response = requests.request(", |out| {
            out.line(r#"config["method"].upper(),"#);
            out.line(r#"config["endpoint_url"],"#);
            out.line("json=records,");
            out.line("headers=headers,");
            out.line("timeout=60,");
        });
        out.line(")");
        out.line("response.raise_for_status()");
        out.line(
            r#"context.log.info(f"Submitted {len(records)} records to {config['endpoint_url']} ({response.status_code})")"#,
        );
        out.block("return {", |out| {
            out.line(r#""output_path": config["endpoint_url"],"#);
            out.line(r#""row_count": len(records),"#);
            out.line(r#""response_status": response.status_code,"#);
        });
        out.line("}");
    }
}

/// Inert writer used for destination kinds without a real implementation.
pub(super) struct PlaceholderSaveTemplate;

impl StageTemplate for PlaceholderSaveTemplate {
    fn variant(&self) -> OperationVariant {
        OperationVariant::PlaceholderSave
    }

    fn config_fields(&self, _op_name: &str, binding: &StageBinding<'_>) -> Vec<ConfigField> {
        let name = bound_destination(binding).map_or("", |d| d.name.as_str());
        vec![
            ConfigField::required("destination_name", FieldType::String, "Name of the skipped destination")
                .with_default(name),
        ]
    }

    fn imports(&self) -> &'static [PythonImport] {
        &[]
    }

    fn render_body(&self, op: &OperationSpec, out: &mut SourceWriter) {
        let kind = match &op.stage {
            Stage::Save {
                destination_kind, ..
            } => destination_kind.as_str(),
            _ => "",
        };
        let message = format!("No writer for destination type '{}'; skipping ", kind);
        out.line("config = context.op_config");
        out.line(r#"data = processed["processed_data"]"#);
        out.line(format!(
            r#"context.log.warning({} + config["destination_name"])"#,
            py_str(&message)
        ));
        out.line(r#"return {"output_path": "", "row_count": len(data)}"#);
    }
}
