//! `ReqwestHelper` against a local mock server.

use nodes::{HttpError, HttpHelper, HttpHelperConfig, HttpMethod, HttpRequestOptions, ReqwestHelper};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn helper() -> ReqwestHelper {
    ReqwestHelper::new(&HttpHelperConfig::default()).expect("client builds")
}

#[tokio::test]
async fn get_sends_headers_and_decodes_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/fusion/v1/spaces"))
        .and(header("authorization", "Bearer tok"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "code": 200,
            "data": { "spaces": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let opts = HttpRequestOptions::new(HttpMethod::Get, format!("{}/fusion/v1/spaces", server.uri()))
        .header("Authorization", "Bearer tok")
        .header("Accept", "application/json");

    let body = helper().request(opts).await.expect("request succeeds");
    assert_eq!(body["data"], json!({ "spaces": [] }));
}

#[tokio::test]
async fn patch_sends_json_body_and_query() {
    let server = MockServer::start().await;
    let payload = json!({ "records": [{ "recordId": "rec1", "fields": { "Title": "x" } }], "fieldKey": "name" });

    Mock::given(method("PATCH"))
        .and(path("/fusion/v1/datasheets/dst1/records"))
        .and(query_param("fieldKey", "name"))
        .and(body_json(payload.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let opts = HttpRequestOptions::new(
        HttpMethod::Patch,
        format!("{}/fusion/v1/datasheets/dst1/records?fieldKey=name", server.uri()),
    )
    .header("Content-Type", "application/json")
    .body(payload);

    let body = helper().request(opts).await.expect("request succeeds");
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn non_success_status_keeps_decoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "code": 401,
            "message": "Invalid API token"
        })))
        .mount(&server)
        .await;

    let opts = HttpRequestOptions::new(HttpMethod::Delete, format!("{}/anything", server.uri()));
    let err = helper().request(opts).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.body().and_then(|b| b["message"].as_str()), Some("Invalid API token"));
}

#[tokio::test]
async fn invalid_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let opts = HttpRequestOptions::new(HttpMethod::Get, server.uri());
    let err = helper().request(opts).await.unwrap_err();
    assert!(matches!(err, HttpError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Port 9 (discard) on localhost is not served by anything in the test env.
    let opts = HttpRequestOptions::new(HttpMethod::Get, "http://127.0.0.1:9/unreachable");
    let err = helper().request(opts).await.unwrap_err();
    assert!(matches!(err, HttpError::Transport { .. }));
}
