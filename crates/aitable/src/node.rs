//! The Aitable node: one request per input item.
//!
//! `AitableNode::execute`:
//! 1. Reads the bearer token from the `aitableApi` credential (fatal if absent).
//! 2. Reads the resource/operation selection from item 0.
//! 3. For every item, builds the request, sends it through the host's
//!    `HttpHelper` and normalizes the answer.
//! 4. On an item failure, records `{ "error": … }` when continue-on-fail is
//!    set, otherwise aborts the invocation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use nodes::{ExecutableNode, ExecutionContext, HttpHelper, NodeError, NodeItem};

use crate::params::ItemParams;
use crate::request::RequestBuilder;
use crate::response::{normalize_http_error, normalize_response};
use crate::{AitableConfig, AitableError, NodeVersion, Resource};

/// Credential type name the node looks up in the execution context.
pub const CREDENTIAL_NAME: &str = "aitableApi";

const DEFAULT_RESOURCE: &str = "space";

pub struct AitableNode {
    version: NodeVersion,
    config: AitableConfig,
    http: Arc<dyn HttpHelper>,
}

impl AitableNode {
    pub fn new(version: NodeVersion, config: AitableConfig, http: Arc<dyn HttpHelper>) -> Self {
        Self { version, config, http }
    }

    pub(crate) fn api_token(ctx: &ExecutionContext) -> Result<&str, AitableError> {
        ctx.credential(CREDENTIAL_NAME)
            .and_then(|credential| credential.get("apiToken"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AitableError::MissingCredentials)
    }

    /// Resource and operation as selected for the first item; an unset
    /// operation falls back to the resource's default.
    fn selection(ctx: &ExecutionContext) -> (String, String) {
        let text = |name: &str| {
            ctx.parameters
                .get_present(name, 0)
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        let resource = text("resource").unwrap_or_else(|| DEFAULT_RESOURCE.to_owned());
        let operation = text("operation").unwrap_or_else(|| {
            Resource::parse(&resource)
                .map(|r| r.default_operation().as_str().to_owned())
                .unwrap_or_default()
        });
        (resource, operation)
    }

    async fn execute_item(
        &self,
        builder: &RequestBuilder<'_>,
        resource: &str,
        operation: &str,
        params: &ItemParams<'_>,
    ) -> Result<Value, AitableError> {
        let request = builder.build(resource, operation, params)?;
        debug!(item = params.index(), method = %request.method, url = %request.url, "issuing request");

        let body = self.http.request(request).await.map_err(normalize_http_error)?;
        normalize_response(self.version, body)
    }
}

#[async_trait]
impl ExecutableNode for AitableNode {
    #[instrument(
        skip(self, items, ctx),
        fields(
            workflow_id = %ctx.workflow_id,
            execution_id = %ctx.execution_id,
            node = %ctx.node_name,
            version = %self.version,
            items = items.len()
        )
    )]
    async fn execute(
        &self,
        items: Vec<NodeItem>,
        ctx: &ExecutionContext,
    ) -> Result<Vec<NodeItem>, NodeError> {
        let token = Self::api_token(ctx)?;
        let (resource, operation) = Self::selection(ctx);
        let builder = RequestBuilder::new(&self.config, token, self.version);

        info!("running {resource}/{operation} over {} items", items.len());

        let mut output = Vec::with_capacity(items.len());

        for index in 0..items.len() {
            let params = ItemParams::new(&ctx.parameters, index);

            match self.execute_item(&builder, &resource, &operation, &params).await {
                Ok(payload) => output.push(NodeItem::new(payload)),

                Err(err) => {
                    let err = NodeError::from(err);
                    if ctx.continue_on_fail && !err.is_fatal() {
                        warn!("item {index} failed, continuing: {err}");
                        output.push(NodeItem::error(err.to_string()));
                    } else {
                        error!("item {index} failed, aborting: {err}");
                        return Err(err);
                    }
                }
            }
        }

        Ok(output)
    }
}
