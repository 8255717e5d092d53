use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured fields pulled out of a posting's text by the extraction service.
///
/// The service is loose about shapes: a field may be a string, a list, or an
/// object carrying a `value`. Accessors flatten those into display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedJob(pub Value);

impl ExtractedJob {
    pub fn field_text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(flatten)
    }

    pub fn company(&self) -> Option<String> {
        self.field_text("company").filter(|c| !c.trim().is_empty())
    }

    pub fn raw_text(&self) -> Option<String> {
        self.field_text("raw_text").filter(|t| !t.trim().is_empty())
    }

    pub fn skills(&self) -> Vec<String> {
        match self.0.get("skills") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(map) => map.get("skill").and_then(flatten),
                    other => flatten(other),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Contact entries of one kind (`emails`, `phones`, `urls`).
    pub fn contacts(&self, kind: &str) -> Vec<String> {
        match self.0.get("contacts").and_then(|c| c.get(kind)) {
            Some(Value::Array(items)) => items.iter().filter_map(flatten).collect(),
            _ => Vec::new(),
        }
    }
}

fn flatten(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(flatten)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(map) => map.get("value").and_then(flatten),
    }
}
