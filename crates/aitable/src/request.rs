//! Parameter-to-request mapping.
//!
//! [`resolve`] is the dispatch table from (version, resource, operation) to an
//! [`Endpoint`]; [`RequestBuilder`] turns an endpoint plus the item's
//! parameters into the outbound request.  Anything the table does not know is
//! rejected before a request exists, so an unsupported selection can never
//! reach the network.

use nodes::{HttpMethod, HttpRequestOptions};
use serde_json::json;

use crate::params::{ItemParams, RecordQuery};
use crate::{AitableConfig, AitableError, NodeVersion, Operation, Resource};

/// The request handed to the host's HTTP helper.
pub type RequestSpec = HttpRequestOptions;

/// Fusion API call a selection resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListSpaces,
    ListNodes,
    /// `GET` search with the fixed datasheet/permission filter.
    SearchNodes,
    /// `POST` search carrying keyword and type filters in the body.
    SearchNodesFiltered,
    ListRecords { view_required: bool },
    ListViews,
    ListFields,
    /// Create from the structured title/long-text form.
    CreateRecordsFromForm,
    CreateRecords,
    UpdateRecords,
    DeleteRecords,
}

/// Look up the endpoint for a selection, `None` when it is not supported.
pub fn resolve(version: NodeVersion, resource: Resource, operation: Operation) -> Option<Endpoint> {
    use NodeVersion::{V1, V2};
    use Operation as Op;
    use Resource as R;

    let endpoint = match (version, resource, operation) {
        (_, R::Space, Op::GetSpaces) => Endpoint::ListSpaces,
        (_, R::Node, Op::GetNodes) => Endpoint::ListNodes,
        (V1, R::Node, Op::SearchNodes) => Endpoint::SearchNodes,
        (V2, R::Node, Op::SearchNodes) => Endpoint::SearchNodesFiltered,
        (_, R::Field, Op::GetFields) => Endpoint::ListFields,

        (V1, R::Datasheet, Op::GetAllRecords) => Endpoint::ListRecords { view_required: true },
        (V1, R::Datasheet, Op::GetViews) => Endpoint::ListViews,
        (V1, R::Datasheet, Op::CreateRecords) => Endpoint::CreateRecordsFromForm,

        (V2, R::Record, Op::GetRecords) => Endpoint::ListRecords { view_required: false },
        (V2, R::Record, Op::CreateRecords) => Endpoint::CreateRecords,
        (V2, R::Record, Op::UpdateRecords) => Endpoint::UpdateRecords,
        (V2, R::Record, Op::DeleteRecords) => Endpoint::DeleteRecords,
        (V2, R::View, Op::GetView) => Endpoint::ListViews,

        _ => return None,
    };
    Some(endpoint)
}

// ---------------------------------------------------------------------------
// Query string
// ---------------------------------------------------------------------------

/// Ordered `key=value` pairs; values are percent-encoded on insert.
#[derive(Debug, Default)]
struct Query(Vec<String>);

impl Query {
    fn push(&mut self, key: &str, value: &str) -> &mut Self {
        self.0.push(format!("{key}={}", urlencoding::encode(value)));
        self
    }

    /// Comma-joined list, each element encoded on its own.
    fn push_list(&mut self, key: &str, values: &[String]) -> &mut Self {
        let joined: Vec<String> = values.iter().map(|v| urlencoding::encode(v).into_owned()).collect();
        self.0.push(format!("{key}={}", joined.join(",")));
        self
    }

    fn push_record_query(&mut self, query: &RecordQuery) -> &mut Self {
        if let Some(fields) = &query.fields {
            self.push("fields", fields);
        }
        if let Some(sort) = &query.sort {
            self.push("sort", sort);
        }
        if let Some(page_size) = query.page_size {
            self.push("pageSize", &page_size.to_string());
        }
        if let Some(page_num) = query.page_num {
            self.push("pageNum", &page_num.to_string());
        }
        self
    }

    fn apply(&self, url: String) -> String {
        if self.0.is_empty() {
            url
        } else {
            format!("{url}?{}", self.0.join("&"))
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds requests for one node invocation.
///
/// Holds the bearer token; must not implement `Debug`.
pub struct RequestBuilder<'a> {
    config: &'a AitableConfig,
    token: &'a str,
    version: NodeVersion,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a AitableConfig, token: &'a str, version: NodeVersion) -> Self {
        Self { config, token, version }
    }

    /// Map the raw resource/operation selection and the item's parameters
    /// onto a request.
    pub fn build(
        &self,
        resource: &str,
        operation: &str,
        params: &ItemParams<'_>,
    ) -> Result<RequestSpec, AitableError> {
        let parsed = Resource::parse(resource)
            .filter(|r| self.version.resources().contains(r))
            .ok_or_else(|| AitableError::UnsupportedResource(resource.to_owned()))?;

        let endpoint = Operation::parse(operation)
            .and_then(|op| resolve(self.version, parsed, op))
            .ok_or_else(|| AitableError::UnsupportedOperation {
                resource: resource.to_owned(),
                operation: operation.to_owned(),
            })?;

        self.endpoint_request(endpoint, params)
    }

    pub fn endpoint_request(
        &self,
        endpoint: Endpoint,
        params: &ItemParams<'_>,
    ) -> Result<RequestSpec, AitableError> {
        let request = match endpoint {
            Endpoint::ListSpaces => self.request(HttpMethod::Get, "/fusion/v1/spaces".into()),

            Endpoint::ListNodes => {
                let space = path_segment(params, "spaceId")?;
                self.request(HttpMethod::Get, format!("/fusion/v1/spaces/{space}/nodes"))
            }

            Endpoint::SearchNodes => {
                let space = path_segment(params, "spaceId")?;
                self.request(
                    HttpMethod::Get,
                    format!("/fusion/v2/spaces/{space}/nodes?type=Datasheet&permissions=0,1"),
                )
            }

            Endpoint::SearchNodesFiltered => {
                let space = path_segment(params, "spaceId")?;
                let filters = params.search_filters()?;
                self.request(HttpMethod::Post, format!("/fusion/v2/spaces/{space}/nodes/search"))
                    .body(filters.to_body())
            }

            Endpoint::ListRecords { view_required } => {
                let datasheet = path_segment(params, "datasheetId")?;
                let view = if view_required {
                    Some(params.required_string("viewId")?)
                } else {
                    params.string("viewId")?
                };
                let record_query = params.record_query()?;

                let mut query = Query::default();
                if let Some(view) = &view {
                    query.push("viewId", view);
                }
                query.push_record_query(&record_query);

                let path = query.apply(format!("/fusion/v1/datasheets/{datasheet}/records"));
                self.request(HttpMethod::Get, path)
            }

            Endpoint::ListViews => {
                let datasheet = path_segment(params, "datasheetId")?;
                self.request(HttpMethod::Get, format!("/fusion/v1/datasheets/{datasheet}/views"))
            }

            Endpoint::ListFields => self.list_fields(&params.required_string("datasheetId")?),

            Endpoint::CreateRecordsFromForm => {
                let datasheet = path_segment(params, "datasheetId")?;
                let view = params.required_string("viewId")?;
                let records = params.structured_records()?;

                let mut query = Query::default();
                query.push("viewId", &view).push("fieldKey", "name");
                let path = query.apply(format!("/fusion/v1/datasheets/{datasheet}/records"));

                self.request(HttpMethod::Post, path)
                    .body(json!({ "records": records, "fieldKey": "name" }))
            }

            Endpoint::CreateRecords | Endpoint::UpdateRecords => {
                let datasheet = path_segment(params, "datasheetId")?;
                let records = params.records_payload()?;
                let field_key = params.field_key()?;

                let method = if endpoint == Endpoint::CreateRecords {
                    HttpMethod::Post
                } else {
                    if let Some(position) = records.iter().position(|r| {
                        r.get("recordId").and_then(|id| id.as_str()).map_or(true, str::is_empty)
                    }) {
                        return Err(AitableError::invalid(
                            "records",
                            format!("record {position} has no \"recordId\""),
                        ));
                    }
                    HttpMethod::Patch
                };

                let mut query = Query::default();
                if let Some(view) = params.string("viewId")? {
                    query.push("viewId", &view);
                }
                query.push("fieldKey", &field_key);
                let path = query.apply(format!("/fusion/v1/datasheets/{datasheet}/records"));

                self.request(method, path)
                    .body(json!({ "records": records, "fieldKey": field_key }))
            }

            Endpoint::DeleteRecords => {
                let datasheet = path_segment(params, "datasheetId")?;
                let ids = params.record_ids()?;

                let mut query = Query::default();
                query.push_list("recordIds", &ids);
                let path = query.apply(format!("/fusion/v1/datasheets/{datasheet}/records"));
                self.request(HttpMethod::Delete, path)
            }
        };
        Ok(request)
    }

    /// `GET` of a datasheet's field list; also used by the option loader.
    pub fn list_fields(&self, datasheet: &str) -> RequestSpec {
        self.request(
            HttpMethod::Get,
            format!("/fusion/v1/datasheets/{}/fields", urlencoding::encode(datasheet)),
        )
    }

    fn request(&self, method: HttpMethod, path: String) -> RequestSpec {
        HttpRequestOptions::new(method, self.config.url(&path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }
}

/// Required identifier, percent-encoded for use as a path segment.
fn path_segment(params: &ItemParams<'_>, name: &str) -> Result<String, AitableError> {
    let id = params.required_string(name)?;
    Ok(urlencoding::encode(&id).into_owned())
}
