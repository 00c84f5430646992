//! The item model nodes consume and produce.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One entry of the list flowing between workflow nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeItem {
    pub json: Value,
}

impl NodeItem {
    pub fn new(json: Value) -> Self {
        Self { json }
    }

    /// Item recorded in place of a failed one when continue-on-fail is set.
    pub fn error(message: impl Into<String>) -> Self {
        Self { json: json!({ "error": message.into() }) }
    }

    pub fn is_error(&self) -> bool {
        self.json.get("error").is_some_and(Value::is_string)
    }
}

impl From<Value> for NodeItem {
    fn from(json: Value) -> Self {
        Self::new(json)
    }
}
