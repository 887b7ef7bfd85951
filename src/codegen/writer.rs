use crate::plan::DefaultValue;

const INDENT: &str = "    ";

/// Line-oriented text buffer with Python-style indentation.
#[derive(Debug, Default)]
pub struct SourceWriter {
    buf: String,
    depth: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one line at the current indentation depth.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Writes `header`, then the lines produced by `body` one level deeper.
    pub fn block(&mut self, header: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        self.line(header);
        self.indent();
        body(self);
        self.dedent();
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Renders a string as a double-quoted Python literal.
///
/// JSON string escaping is a subset of what Python accepts, so the JSON
/// encoder does the escaping.
pub fn py_str(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Renders a JSON value as the equivalent Python literal.
pub fn py_literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "None".to_string(),
        serde_json::Value::Bool(true) => "True".to_string(),
        serde_json::Value::Bool(false) => "False".to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => py_str(s),
        serde_json::Value::Array(items) => {
            let items: Vec<String> = items.iter().map(py_literal).collect();
            format!("[{}]", items.join(", "))
        }
        serde_json::Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", py_str(k), py_literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Renders a job-level default, using env indirection for credentials.
pub fn py_default(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Literal(value) => py_literal(value),
        DefaultValue::Env(var) => format!("{{\"env\": {}}}", py_str(var)),
    }
}
