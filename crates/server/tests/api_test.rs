//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use netbuilder_core::{record, Config, Record};
use netbuilder_network::NetworkBuilder;
use netbuilder_server::{build_router, AppState};
use netbuilder_source::MemorySource;
use serde_json::{json, Value};
use tower::ServiceExt;

const NODES: &str = "SELECT ?id ?name WHERE { VALUES ?id { <ID_SET> } }";
const LINKS: &str = "SELECT ?source ?target WHERE { ?source ?p ?target }";

fn link(s: &str, t: &str) -> Record {
    record([("source", s), ("target", t)])
}

fn app(source: MemorySource) -> Router {
    let config = Config::default();
    let builder = NetworkBuilder::new(Arc::new(source), config.builder.clone());
    build_router(Arc::new(AppState { builder, config }))
}

fn body(extra: Value) -> Value {
    let mut params = json!({
        "endpoint": "http://example.org/sparql",
        "nodes": NODES,
        "links": LINKS,
    });
    if let (Some(base), Some(more)) = (params.as_object_mut(), extra.as_object()) {
        base.extend(more.clone());
    }
    params
}

fn post(params: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(params.to_string()))
        .unwrap()
}

async fn read(response: axum::response::Response) -> (StatusCode, String, String) {
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app(MemorySource::new())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let (status, _, text) = read(response).await;

    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["status"], "ok");
    assert_eq!(v["profile"], "default");
}

#[tokio::test]
async fn post_returns_cytoscape_json() {
    let source = MemorySource::new().respond("LIMIT 1000", vec![link("a", "b"), link("b", "c")]);
    let response = app(source).oneshot(post(body(json!({})))).await.unwrap();
    let (status, content_type, text) = read(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");
    let v: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["elements"]["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(v["metrics"]["number_of_edges"], 2);
    assert_eq!(v["metrics"]["diameter"], 2);
}

#[tokio::test]
async fn get_accepts_string_options() {
    let source = MemorySource::new().respond("LIMIT 5", vec![link("a", "b")]);
    let uri = format!(
        "/query?endpoint=http%3A%2F%2Fexample.org%2Fsparql&nodes={}&links={}&limit=10&optimize=0.5&format=graphml&removeMultipleLinks=false",
        urlencoding::encode(NODES),
        urlencoding::encode(LINKS)
    );
    let response = app(source)
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let (status, content_type, text) = read(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/xml");
    assert!(text.contains(r#"<edge source="a" target="b"/>"#));
}

#[tokio::test]
async fn missing_placeholder_is_bad_request() {
    let response = app(MemorySource::new())
        .oneshot(post(body(json!({ "nodes": "SELECT ?id WHERE {}" }))))
        .await
        .unwrap();
    let (status, _, text) = read(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_str(&text).unwrap();
    assert!(v["error"].as_str().unwrap().contains("<ID_SET>"));
}

#[tokio::test]
async fn unparseable_body_is_bad_request() {
    let response = app(MemorySource::new())
        .oneshot(post(json!({ "endpoint": "x" })))
        .await
        .unwrap();
    let (status, _, text) = read(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_str(&text).unwrap();
    assert!(v["error"].is_string());
}

#[tokio::test]
async fn source_failure_is_bad_gateway() {
    let source = MemorySource::new().fail("LIMIT", "connection refused");
    let response = app(source).oneshot(post(body(json!({})))).await.unwrap();
    let (status, _, text) = read(response).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(text.contains("connection refused"));
}
