//! Typed readers over the raw per-item parameter values.

use nodes::NodeParameters;
use serde_json::{json, Map, Value};

use crate::AitableError;

/// Upper bound Aitable accepts for `pageSize`.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Parameter view for a single input item.
#[derive(Debug, Clone, Copy)]
pub struct ItemParams<'a> {
    params: &'a NodeParameters,
    index: usize,
}

/// Optional query augmentation for record listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub fields: Option<String>,
    pub sort: Option<String>,
    pub page_size: Option<u64>,
    pub page_num: Option<u64>,
}

/// Filters sent with the v2 node search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub node_type: Option<String>,
    pub permissions: Option<Vec<u64>>,
    pub query: Option<String>,
}

impl SearchFilters {
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(node_type) = &self.node_type {
            body.insert("type".into(), json!(node_type));
        }
        if let Some(permissions) = &self.permissions {
            body.insert("permissions".into(), json!(permissions));
        }
        if let Some(query) = &self.query {
            body.insert("query".into(), json!(query));
        }
        Value::Object(body)
    }
}

impl<'a> ItemParams<'a> {
    pub fn new(params: &'a NodeParameters, index: usize) -> Self {
        Self { params, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn value(&self, name: &str) -> Option<&'a Value> {
        self.params.get_present(name, self.index)
    }

    /// Trimmed string parameter; blank strings count as absent.
    pub fn string(&self, name: &str) -> Result<Option<String>, AitableError> {
        match self.value(name) {
            None => Ok(None),
            Some(value) => scalar_string(name, value),
        }
    }

    pub fn required_string(&self, name: &str) -> Result<String, AitableError> {
        self.string(name)?.ok_or_else(|| AitableError::missing(name))
    }

    /// `additionalFields` collection for record listing.
    pub fn record_query(&self) -> Result<RecordQuery, AitableError> {
        let Some(extra) = self.value("additionalFields") else {
            return Ok(RecordQuery::default());
        };
        let Some(extra) = extra.as_object() else {
            return Err(AitableError::invalid("additionalFields", "expected an object"));
        };

        let fields = match extra.get("fields").filter(|v| !v.is_null()) {
            None => None,
            Some(Value::Array(names)) => {
                let names = names
                    .iter()
                    .map(|n| scalar_string("additionalFields.fields", n))
                    .collect::<Result<Vec<_>, _>>()?;
                let joined: Vec<String> = names.into_iter().flatten().collect();
                (!joined.is_empty()).then(|| joined.join(","))
            }
            Some(other) => scalar_string("additionalFields.fields", other)?,
        };

        let sort = match extra.get("sort").filter(|v| !v.is_null()) {
            None => None,
            Some(Value::String(raw)) if raw.trim().is_empty() => None,
            Some(Value::String(raw)) => {
                serde_json::from_str::<Value>(raw).map_err(|e| {
                    AitableError::invalid("additionalFields.sort", format!("invalid JSON: {e}"))
                })?;
                Some(raw.trim().to_owned())
            }
            Some(structured @ (Value::Array(_) | Value::Object(_))) => Some(structured.to_string()),
            Some(_) => {
                return Err(AitableError::invalid("additionalFields.sort", "expected JSON"));
            }
        };

        let page_size = bounded_integer(extra.get("pageSize"), "additionalFields.pageSize", 1, MAX_PAGE_SIZE)?;
        let page_num = bounded_integer(extra.get("pageNum"), "additionalFields.pageNum", 1, u64::MAX)?;

        Ok(RecordQuery { fields, sort, page_size, page_num })
    }

    /// `records` for create/update: a JSON string or structured value that
    /// decodes to a non-empty array of record objects.
    pub fn records_payload(&self) -> Result<Vec<Value>, AitableError> {
        let raw = self.value("records").ok_or_else(|| AitableError::missing("records"))?;

        let decoded = match raw {
            Value::String(text) => serde_json::from_str::<Value>(text)
                .map_err(|e| AitableError::invalid("records", format!("invalid JSON: {e}")))?,
            other => other.clone(),
        };

        let records = match decoded {
            Value::Array(records) => records,
            Value::Object(mut wrapper) => match wrapper.remove("records") {
                Some(Value::Array(records)) => records,
                _ => return Err(AitableError::invalid("records", "expected a JSON array of records")),
            },
            _ => return Err(AitableError::invalid("records", "expected a JSON array of records")),
        };

        if records.is_empty() {
            return Err(AitableError::invalid("records", "at least one record is required"));
        }
        if records.iter().any(|r| !r.is_object()) {
            return Err(AitableError::invalid("records", "every record must be a JSON object"));
        }
        Ok(records)
    }

    /// Structured `records.record` entries of the v1 create form.
    pub fn structured_records(&self) -> Result<Vec<Value>, AitableError> {
        let entries = match self.value("records.record") {
            None => return Ok(Vec::new()),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(AitableError::invalid("records.record", "expected a list")),
        };

        entries
            .iter()
            .map(|entry| -> Result<Value, AitableError> {
                let text = |key: &str| -> Result<String, AitableError> {
                    match entry.get(key).filter(|v| !v.is_null()) {
                        None => Ok(String::new()),
                        Some(Value::String(s)) => Ok(s.clone()),
                        Some(Value::Number(n)) => Ok(n.to_string()),
                        Some(_) => Err(AitableError::invalid(
                            "records.record",
                            format!("\"{key}\" must be text"),
                        )),
                    }
                };
                Ok(json!({
                    "fields": {
                        "Title": text("title")?,
                        "Long text": text("longText")?,
                        "Long text 2": text("longText2")?,
                    }
                }))
            })
            .collect()
    }

    /// `fieldKey`: `name` (default) or `id`.
    pub fn field_key(&self) -> Result<String, AitableError> {
        match self.string("fieldKey")?.as_deref() {
            None | Some("name") => Ok("name".to_owned()),
            Some("id") => Ok("id".to_owned()),
            Some(other) => Err(AitableError::invalid(
                "fieldKey",
                format!("expected \"name\" or \"id\", got \"{other}\""),
            )),
        }
    }

    /// `recordIds`: comma-separated string or list; blanks are dropped.
    pub fn record_ids(&self) -> Result<Vec<String>, AitableError> {
        let raw = self.value("recordIds").ok_or_else(|| AitableError::missing("recordIds"))?;

        let ids: Vec<String> = match raw {
            Value::String(list) => list
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
                .collect(),
            Value::Array(items) => items
                .iter()
                .map(|id| scalar_string("recordIds", id))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .flatten()
                .collect(),
            _ => return Err(AitableError::invalid("recordIds", "expected a comma-separated list")),
        };

        if ids.is_empty() {
            return Err(AitableError::missing("recordIds"));
        }
        Ok(ids)
    }

    /// `searchFilters` collection of the v2 node search.
    pub fn search_filters(&self) -> Result<SearchFilters, AitableError> {
        let Some(filters) = self.value("searchFilters") else {
            return Ok(SearchFilters::default());
        };
        let Some(filters) = filters.as_object() else {
            return Err(AitableError::invalid("searchFilters", "expected an object"));
        };

        let text = |key: &str, name: &str| -> Result<Option<String>, AitableError> {
            match filters.get(key).filter(|v| !v.is_null()) {
                None => Ok(None),
                Some(v) => scalar_string(name, v),
            }
        };

        let permissions = match filters.get("permissions").filter(|v| !v.is_null()) {
            None => None,
            Some(Value::Array(levels)) => Some(
                levels
                    .iter()
                    .map(permission_level)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Some(Value::String(list)) => {
                let levels = list
                    .split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(|l| permission_level(&json!(l)))
                    .collect::<Result<Vec<_>, _>>()?;
                (!levels.is_empty()).then_some(levels)
            }
            Some(other) => Some(vec![permission_level(other)?]),
        };

        Ok(SearchFilters {
            node_type: text("type", "searchFilters.type")?,
            permissions,
            query: text("query", "searchFilters.query")?,
        })
    }
}

fn scalar_string(name: &str, value: &Value) -> Result<Option<String>, AitableError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
        }
        Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(AitableError::invalid(name, "expected a string")),
    }
}

fn bounded_integer(
    value: Option<&Value>,
    name: &str,
    min: u64,
    max: u64,
) -> Result<Option<u64>, AitableError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Some(_) => None,
    };

    match parsed {
        Some(n) if (min..=max).contains(&n) => Ok(Some(n)),
        Some(n) if max == u64::MAX => Err(AitableError::invalid(name, format!("{n} is below {min}"))),
        Some(n) => Err(AitableError::invalid(name, format!("{n} is outside {min}..={max}"))),
        None => Err(AitableError::invalid(name, "expected a positive integer")),
    }
}

fn permission_level(value: &Value) -> Result<u64, AitableError> {
    let level = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    level.ok_or_else(|| AitableError::invalid("searchFilters.permissions", "expected integer levels"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Value) -> NodeParameters {
        NodeParameters::from_value(value)
    }

    #[test]
    fn blank_string_counts_as_missing() {
        let p = params(json!({ "spaceId": "   " }));
        let item = ItemParams::new(&p, 0);
        assert_eq!(item.string("spaceId"), Ok(None));
        assert_eq!(item.required_string("spaceId"), Err(AitableError::missing("spaceId")));
    }

    #[test]
    fn record_query_reads_all_four_fields() {
        let p = params(json!({
            "additionalFields": {
                "pageSize": 50,
                "pageNum": "2",
                "fields": ["a", " b "],
                "sort": "[{\"field\":\"a\",\"order\":\"desc\"}]"
            }
        }));
        let query = ItemParams::new(&p, 0).record_query().unwrap();
        assert_eq!(
            query,
            RecordQuery {
                fields: Some("a,b".into()),
                sort: Some("[{\"field\":\"a\",\"order\":\"desc\"}]".into()),
                page_size: Some(50),
                page_num: Some(2),
            }
        );
    }

    #[test]
    fn whole_number_floats_are_accepted_for_paging() {
        let p = params(json!({ "additionalFields": { "pageSize": 50.0, "pageNum": 2.0 } }));
        let query = ItemParams::new(&p, 0).record_query().unwrap();
        assert_eq!(query.page_size, Some(50));
        assert_eq!(query.page_num, Some(2));
    }

    #[test]
    fn structured_sort_is_serialized() {
        let p = params(json!({ "additionalFields": { "sort": [{ "field": "a", "order": "asc" }] } }));
        let query = ItemParams::new(&p, 0).record_query().unwrap();
        assert_eq!(query.sort.as_deref(), Some(r#"[{"field":"a","order":"asc"}]"#));
    }

    #[test]
    fn page_size_bounds_are_enforced() {
        for bad in [json!(0), json!(1001), json!(-5), json!("ten"), json!(2.5)] {
            let p = params(json!({ "additionalFields": { "pageSize": bad } }));
            assert!(
                matches!(
                    ItemParams::new(&p, 0).record_query(),
                    Err(AitableError::InvalidParameter { ref name, .. }) if name == "additionalFields.pageSize"
                ),
                "pageSize {bad} should be rejected"
            );
        }
        let p = params(json!({ "additionalFields": { "pageSize": 1000, "pageNum": 1 } }));
        assert!(ItemParams::new(&p, 0).record_query().is_ok());
    }

    #[test]
    fn page_num_must_be_positive() {
        let p = params(json!({ "additionalFields": { "pageNum": 0 } }));
        assert!(ItemParams::new(&p, 0).record_query().is_err());
    }

    #[test]
    fn invalid_sort_json_is_rejected() {
        let p = params(json!({ "additionalFields": { "sort": "[{field: a}" } }));
        assert!(matches!(
            ItemParams::new(&p, 0).record_query(),
            Err(AitableError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn records_payload_accepts_string_array_and_wrapper() {
        let as_string = params(json!({ "records": "[{\"fields\":{\"Title\":\"x\"}}]" }));
        let as_array = params(json!({ "records": [{ "fields": { "Title": "x" } }] }));
        let as_wrapper = params(json!({ "records": { "records": [{ "fields": { "Title": "x" } }] } }));

        let expected = vec![json!({ "fields": { "Title": "x" } })];
        assert_eq!(ItemParams::new(&as_string, 0).records_payload().unwrap(), expected);
        assert_eq!(ItemParams::new(&as_array, 0).records_payload().unwrap(), expected);
        assert_eq!(ItemParams::new(&as_wrapper, 0).records_payload().unwrap(), expected);
    }

    #[test]
    fn records_payload_rejects_bad_input() {
        for bad in [json!("{not json"), json!("[]"), json!("42"), json!("[1, 2]")] {
            let p = params(json!({ "records": bad }));
            assert!(
                matches!(ItemParams::new(&p, 0).records_payload(), Err(AitableError::InvalidParameter { .. })),
                "{bad} should be rejected"
            );
        }
        let p = params(json!({}));
        assert_eq!(ItemParams::new(&p, 0).records_payload(), Err(AitableError::missing("records")));
    }

    #[test]
    fn structured_records_map_to_named_fields() {
        let p = params(json!({
            "records": { "record": [{ "title": "T", "longText": "L" }] }
        }));
        let records = ItemParams::new(&p, 0).structured_records().unwrap();
        assert_eq!(
            records,
            vec![json!({ "fields": { "Title": "T", "Long text": "L", "Long text 2": "" } })]
        );
    }

    #[test]
    fn record_ids_accept_string_or_list() {
        let csv = params(json!({ "recordIds": " rec1, ,rec2 " }));
        let list = params(json!({ "recordIds": ["rec1", "", "rec2"] }));
        assert_eq!(ItemParams::new(&csv, 0).record_ids().unwrap(), vec!["rec1", "rec2"]);
        assert_eq!(ItemParams::new(&list, 0).record_ids().unwrap(), vec!["rec1", "rec2"]);

        let empty = params(json!({ "recordIds": " , " }));
        assert_eq!(ItemParams::new(&empty, 0).record_ids(), Err(AitableError::missing("recordIds")));
    }

    #[test]
    fn field_key_defaults_to_name() {
        let none = params(json!({}));
        let id = params(json!({ "fieldKey": "id" }));
        let bad = params(json!({ "fieldKey": "label" }));
        assert_eq!(ItemParams::new(&none, 0).field_key().unwrap(), "name");
        assert_eq!(ItemParams::new(&id, 0).field_key().unwrap(), "id");
        assert!(ItemParams::new(&bad, 0).field_key().is_err());
    }

    #[test]
    fn search_filters_build_sparse_body() {
        let p = params(json!({
            "searchFilters": { "type": "Datasheet", "permissions": "0, 1", "query": "budget" }
        }));
        let filters = ItemParams::new(&p, 0).search_filters().unwrap();
        assert_eq!(
            filters.to_body(),
            json!({ "type": "Datasheet", "permissions": [0, 1], "query": "budget" })
        );

        let empty = params(json!({}));
        assert_eq!(ItemParams::new(&empty, 0).search_filters().unwrap().to_body(), json!({}));
    }
}
