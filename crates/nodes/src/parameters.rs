//! Parameter access for a node invocation.
//!
//! Parameters are configured once per node and may be overridden per input
//! item (the host resolves expressions such as `{{ $json.id }}` before the
//! node runs and hands the results over as item overrides).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Node parameters plus optional per-item overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeParameters {
    /// Values shared by every item.
    #[serde(default)]
    pub node: Map<String, Value>,
    /// Per-item overrides, indexed like the input items.
    #[serde(default)]
    pub items: Vec<Map<String, Value>>,
}

impl NodeParameters {
    pub fn new(node: Map<String, Value>) -> Self {
        Self { node, items: Vec::new() }
    }

    /// Build from a JSON object; anything else yields empty parameters.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(node) => Self::new(node),
            _ => Self::default(),
        }
    }

    /// Append the overrides for the next item.
    pub fn with_item(mut self, overrides: Map<String, Value>) -> Self {
        self.items.push(overrides);
        self
    }

    /// Look up a parameter for `item_index`.
    ///
    /// `path` may be dotted (`records.record`, `additionalFields.pageSize`);
    /// the first segment is resolved against the item's overrides before the
    /// node-level values.
    pub fn get(&self, path: &str, item_index: usize) -> Option<&Value> {
        let mut segments = path.split('.');
        let head = segments.next()?;

        let mut current = self
            .items
            .get(item_index)
            .and_then(|overrides| overrides.get(head))
            .or_else(|| self.node.get(head))?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Like [`get`](Self::get) but treats `null` as absent.
    pub fn get_present(&self, path: &str, item_index: usize) -> Option<&Value> {
        self.get(path, item_index).filter(|v| !v.is_null())
    }
}
