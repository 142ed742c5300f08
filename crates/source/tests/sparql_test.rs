//! SparqlClient against a mock HTTP endpoint.

use netbuilder_core::config::SourceConfig;
use netbuilder_core::FieldValue;
use netbuilder_source::{RecordSource, SourceError, SourceHeaders, SparqlClient};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS: &str = r#"{
  "head": { "vars": ["source", "target", "weight"] },
  "results": { "bindings": [
    { "source": { "type": "uri", "value": "http://ex.org/a" },
      "target": { "type": "uri", "value": "http://ex.org/b" },
      "weight": { "type": "literal", "value": "3", "datatype": "http://www.w3.org/2001/XMLSchema#integer" } }
  ] }
}"#;

fn client() -> SparqlClient {
    SparqlClient::new(&SourceConfig::default()).unwrap()
}

#[tokio::test]
async fn posts_form_query_and_decodes_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sparql"))
        .and(header("accept", "application/sparql-results+json"))
        .and(header("x-api-key", "secret"))
        .and(body_string_contains("query=SELECT"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = SourceHeaders::new();
    headers.insert("X-Api-Key".into(), "secret".into());

    let rows = client()
        .query(
            "SELECT ?source ?target WHERE {}",
            &format!("{}/sparql", server.uri()),
            &headers,
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["source"], FieldValue::from("http://ex.org/a"));
    assert_eq!(rows[0]["weight"], FieldValue::Integer(3));
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Virtuoso 37000 Error"))
        .mount(&server)
        .await;

    let err = client()
        .query("SELECT 1", &server.uri(), &SourceHeaders::new())
        .await
        .unwrap_err();

    match err {
        SourceError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("Virtuoso"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client()
        .query("SELECT 1", &server.uri(), &SourceHeaders::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_http_error() {
    let err = client()
        .query("SELECT 1", "http://127.0.0.1:1/sparql", &SourceHeaders::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Http(_)));
}
