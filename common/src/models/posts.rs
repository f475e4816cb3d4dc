use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A blog post document. Stored and returned as submitted; only `id` is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostModel(pub Map<String, Value>);

impl PostModel {
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }
}
