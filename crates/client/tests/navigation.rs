//! Integration tests for walking the API from its root document

mod common;

use http::StatusCode;
use serde_json::json;

use vcider::graph::ResourceGraph;
use vcider::transport::Method;
use vcider::{ApiError, Client};

fn root() -> serde_json::Value {
    json!({
        "links": {
            "nodes_list": { "uri": "/api/nodes/", "methods": ["GET", "POST"] },
            "networks_list": { "uri": "/api/networks/" },
            "server": { "uri": "/api/server_info/", "methods": ["GET"] }
        },
        "volatile": { "num_nodes": 1, "num_nets": 0 }
    })
}

#[tokio::test]
async fn test_nodes_list_round_trip() {
    let env = common::setup_test_env("https://my.vcider.com/api");
    env.transport.push_json(StatusCode::OK, root());
    env.transport.push_created("/api/nodes/abc/");
    env.transport
        .push_json(StatusCode::OK, json!({ "name": "foo", "links": {} }));

    let graph = ResourceGraph::new(env.api.clone());
    let link = graph.resolve("nodes_list").await.unwrap();
    assert_eq!(link.uri(), "/api/nodes/");

    let nodes = graph.proxy("nodes_list").await.unwrap();
    let created = nodes.create(r#"{"name":"foo"}"#).await.unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(created.location(), Some("/api/nodes/abc/"));

    let fetched = nodes.get("abc").await.unwrap();
    let body: serde_json::Value = fetched.json().unwrap();
    assert_eq!(body["name"], "foo");

    let requests = env.transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        (requests[0].method, requests[0].url.path()),
        (Method::Get, "/api/")
    );
    assert_eq!(
        (requests[1].method, requests[1].url.path()),
        (Method::Post, "/api/nodes/")
    );
    assert_eq!(
        (requests[2].method, requests[2].url.path()),
        (Method::Get, "/api/nodes/abc/")
    );
}

#[tokio::test]
async fn test_unsupported_delete_sends_nothing() {
    let env = common::setup_test_env("https://my.vcider.com/api");
    env.transport.push_json(StatusCode::OK, root());

    let client = Client::from_api(env.api.clone());
    let nodes = client.nodes().await.unwrap();
    let calls = env.transport.calls();

    let result = nodes.delete("abc").await;
    assert!(matches!(
        result,
        Err(ApiError::OperationNotSupported { method: Method::Delete, ref link }) if link == "nodes_list"
    ));
    assert_eq!(env.transport.calls(), calls);
}

#[tokio::test]
async fn test_read_only_link() {
    let env = common::setup_test_env("https://my.vcider.com/api");
    env.transport.push_json(StatusCode::OK, root());

    let client = Client::from_api(env.api.clone());
    let server = client.graph().proxy("server").await.unwrap();
    assert!(matches!(
        server.update("x", "{}").await,
        Err(ApiError::OperationNotSupported { method: Method::Put, .. })
    ));
    assert_eq!(env.transport.calls(), 1);
}

#[tokio::test]
async fn test_server_moves_a_resource() {
    let env = common::setup_test_env("https://my.vcider.com/api");
    env.transport.push_json(StatusCode::OK, root());
    env.transport.push_json(
        StatusCode::OK,
        json!({ "links": { "nodes_list": { "uri": "/api/v2/nodes/" } } }),
    );
    env.transport.push_json(StatusCode::OK, json!([]));

    let client = Client::from_api(env.api.clone());
    assert_eq!(client.nodes().await.unwrap().uri(), "/api/nodes/");

    client.graph().refresh().await.unwrap();
    let nodes = client.nodes().await.unwrap();
    assert!(nodes.entries(false).await.unwrap().is_empty());
    assert_eq!(
        env.transport.last_request().unwrap().url.path(),
        "/api/v2/nodes/"
    );
}

#[tokio::test]
async fn test_drift_is_reported_not_retried() {
    let env = common::setup_test_env("https://my.vcider.com/api");
    env.transport
        .push_body(StatusCode::FORBIDDEN, "Excessive time drift");
    env.transport.push_json(
        StatusCode::OK,
        json!({ "volatile": { "server_time": common::NOW - 900 } }),
    );
    env.transport.push_json(StatusCode::OK, root());

    let response = env.api.get("").await.unwrap();
    assert!(response.is_excessive_time_drift());
    assert_eq!(env.transport.calls(), 1);

    env.api.time_sync().await.unwrap();
    let graph = ResourceGraph::new(env.api.clone());
    graph.root().await.unwrap();

    let last = env.transport.last_request().unwrap();
    assert_eq!(
        last.header("x-vcider-timestamp"),
        Some((common::NOW - 900).to_string().as_str())
    );
}
