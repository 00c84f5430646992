//! The `ExecutableNode` trait, the contract every node must fulfil.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{NodeError, NodeItem, NodeParameters};

/// Everything the host hands a node for one invocation.
///
/// Defined here (in the nodes crate) so the host and individual node
/// implementations can share it without depending on each other.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// ID of the parent workflow.
    pub workflow_id: Uuid,
    /// ID of the current execution run.
    pub execution_id: Uuid,
    /// Display name of the node inside the workflow, used in error messages.
    pub node_name: String,
    /// Configured parameters, resolved per item.
    pub parameters: NodeParameters,
    /// Decrypted credentials keyed by credential type name.
    pub credentials: HashMap<String, Value>,
    /// When set, item failures become `{ "error": … }` items instead of
    /// aborting the invocation.
    pub continue_on_fail: bool,
}

impl ExecutionContext {
    pub fn new(node_name: impl Into<String>, parameters: NodeParameters) -> Self {
        Self {
            workflow_id: Uuid::new_v4(),
            execution_id: Uuid::new_v4(),
            node_name: node_name.into(),
            parameters,
            credentials: HashMap::new(),
            continue_on_fail: false,
        }
    }

    pub fn with_credential(mut self, name: impl Into<String>, data: Value) -> Self {
        self.credentials.insert(name.into(), data);
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    pub fn credential(&self, name: &str) -> Option<&Value> {
        self.credentials.get(name)
    }
}

/// The core node trait.
///
/// A node receives every input item of the invocation and returns one output
/// item per input item, in the same order.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    async fn execute(
        &self,
        items: Vec<NodeItem>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<NodeItem>, NodeError>;
}
