//! End-to-end: `AitableNode` + `ReqwestHelper` against a mock Aitable server.

use std::sync::Arc;

use aitable::{AitableConfig, AitableNode, NodeVersion, CREDENTIAL_NAME};
use nodes::{ExecutableNode, ExecutionContext, HttpHelperConfig, NodeItem, NodeParameters, ReqwestHelper};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn node_for(server: &MockServer, version: NodeVersion) -> AitableNode {
    let http = ReqwestHelper::new(&HttpHelperConfig::default()).expect("client builds");
    AitableNode::new(version, AitableConfig::new(server.uri()), Arc::new(http))
}

fn context(parameters: serde_json::Value) -> ExecutionContext {
    ExecutionContext::new("Aitable", NodeParameters::from_value(parameters))
        .with_credential(CREDENTIAL_NAME, json!({ "apiToken": "usk123" }))
}

#[tokio::test]
async fn lists_records_with_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fusion/v1/datasheets/dst1/records"))
        .and(query_param("viewId", "viw1"))
        .and(query_param("pageSize", "50"))
        .and(query_param("pageNum", "2"))
        .and(query_param("fields", "Title,Notes"))
        .and(header("authorization", "Bearer usk123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "code": 200,
            "message": "SUCCESS",
            "data": { "total": 1, "records": [{ "recordId": "rec1", "fields": { "Title": "x" } }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(json!({
        "resource": "record",
        "operation": "getRecords",
        "datasheetId": "dst1",
        "viewId": "viw1",
        "additionalFields": { "pageSize": 50, "pageNum": 2, "fields": "Title,Notes" }
    }));

    let out = node_for(&server, NodeVersion::V2)
        .execute(vec![NodeItem::default()], &ctx)
        .await
        .unwrap();

    assert_eq!(out[0].json["total"], 1);
    assert_eq!(out[0].json["records"][0]["recordId"], "rec1");
}

#[tokio::test]
async fn updates_records_with_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/fusion/v1/datasheets/dst1/records"))
        .and(query_param("fieldKey", "name"))
        .and(body_json(json!({
            "records": [{ "recordId": "rec1", "fields": { "Title": "renamed" } }],
            "fieldKey": "name"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "code": 200,
            "data": { "records": [{ "recordId": "rec1" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(json!({
        "resource": "record",
        "operation": "updateRecords",
        "datasheetId": "dst1",
        "records": "[{\"recordId\":\"rec1\",\"fields\":{\"Title\":\"renamed\"}}]"
    }));

    let out = node_for(&server, NodeVersion::V2)
        .execute(vec![NodeItem::default()], &ctx)
        .await
        .unwrap();
    assert_eq!(out[0].json, json!({ "records": [{ "recordId": "rec1" }] }));
}

#[tokio::test]
async fn api_error_status_becomes_error_item() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fusion/v1/spaces"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "code": 401,
            "message": "Invalid API token"
        })))
        .mount(&server)
        .await;

    let ctx = context(json!({ "resource": "space", "operation": "getSpaces" })).with_continue_on_fail(true);

    let out = node_for(&server, NodeVersion::V1)
        .execute(vec![NodeItem::default()], &ctx)
        .await
        .unwrap();
    assert_eq!(out[0].json, json!({ "error": "Aitable request failed: Invalid API token" }));
}
