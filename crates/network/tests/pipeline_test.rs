//! End-to-end network queries against a scripted record source.

use std::sync::Arc;

use netbuilder_core::config::BuilderConfig;
use netbuilder_core::{record, BuilderError, FieldValue, LogLevel, OutputFormat, QueryParams, Record};
use netbuilder_network::{to_cytoscape, NetworkBuilder, QueryOutput};
use netbuilder_source::MemorySource;
use serde_json::json;

const ENDPOINT: &str = "http://example.org/sparql";
const NODES: &str = "SELECT ?id ?name WHERE { VALUES ?id { <ID_SET> } }";
const EGO_LINKS: &str = "SELECT ?source ?target WHERE { VALUES ?s { <ID> } ?s ?p ?o }";
const SOCIO_LINKS: &str = "SELECT ?source ?target WHERE { ?source ?p ?target }";

fn link(s: &str, t: &str) -> Record {
    record([("source", s), ("target", t)])
}

fn named(id: &str, name: &str) -> Record {
    record([("id", id), ("name", name)])
}

fn builder(source: MemorySource) -> (NetworkBuilder, Arc<MemorySource>) {
    let source = Arc::new(source);
    let builder = NetworkBuilder::new(source.clone(), BuilderConfig::default());
    (builder, source)
}

fn ego(id: &str) -> QueryParams {
    QueryParams::new(ENDPOINT, NODES, EGO_LINKS).with_id(id)
}

fn socio() -> QueryParams {
    QueryParams::new(ENDPOINT, NODES, SOCIO_LINKS)
}

fn attr<'a>(net: &'a netbuilder_network::Network, node: &str, key: &str) -> Option<&'a FieldValue> {
    net.graph.nodes[node].attributes.get(key)
}

#[tokio::test]
async fn egocentric_expansion_scenario() {
    let (builder, source) = builder(
        MemorySource::new()
            .respond("?id ?name", vec![named("X", "Ex"), named("Q", "not in graph")])
            .respond("{ <X> }", vec![link("X", "Y"), link("Y", "Z")]),
    );
    // floor(3 * 0.67) = 2, so the first round already reaches the threshold.
    let params = ego("X").with_limit(3).with_optimize(0.67);

    let net = builder.build(&params).await.unwrap();

    let ids: Vec<&str> = net.graph.nodes.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["X", "Y", "Z"]);
    assert!(net.graph.has_edge("X", "Y"));
    assert!(net.graph.has_edge("Y", "Z"));
    assert_eq!(net.graph.edge_count(), 2);

    let queries = source.queries();
    assert_eq!(queries.len(), 2);
    assert!(queries[1].contains("VALUES ?id { <X> <Y> <Z> }"));

    assert_eq!(attr(&net, "X", "distance"), Some(&FieldValue::Integer(0)));
    assert_eq!(attr(&net, "Z", "distance"), Some(&FieldValue::Integer(2)));
    assert_eq!(attr(&net, "X", "name"), Some(&FieldValue::from("Ex")));
    assert_eq!(attr(&net, "Y", "name"), None);
    assert_eq!(attr(&net, "Y", "degree"), Some(&FieldValue::Integer(2)));
    assert!(!net.graph.has_node("Q"));

    assert_eq!(net.metrics["number_of_nodes"], FieldValue::Integer(3));
    assert_eq!(net.metrics["diameter"], FieldValue::Integer(2));
}

#[tokio::test]
async fn repeated_queries_are_identical() {
    let script = || {
        MemorySource::new().respond(
            "LIMIT",
            vec![
                link("a", "b"),
                link("b", "c"),
                link("c", "a"),
                link("c", "d"),
                link("e", "f"),
            ],
        )
    };
    let params = socio().with_limit(4);

    let (first, _) = builder(script());
    let (second, _) = builder(script());
    let a = first.build(&params).await.unwrap();
    let b = second.build(&params).await.unwrap();

    assert_ne!(a.invocation, b.invocation);
    assert_eq!(to_cytoscape(&a), to_cytoscape(&b));
}

#[tokio::test]
async fn empty_expansion_returns_seed_only() {
    let (builder, _) = builder(MemorySource::new());

    let net = builder.build(&ego("lonely")).await.unwrap();

    assert_eq!(net.graph.node_count(), 1);
    assert_eq!(net.graph.edge_count(), 0);
    assert_eq!(attr(&net, "lonely", "distance"), Some(&FieldValue::Integer(0)));
    assert_eq!(attr(&net, "lonely", "degree"), Some(&FieldValue::Integer(0)));
    assert!(net.metrics.is_empty());
}

#[tokio::test]
async fn empty_sociocentric_sample_is_not_an_error() {
    let (builder, source) = builder(MemorySource::new().fail("?id ?name", "should not run"));

    let out = builder.query(&socio()).await.unwrap();

    let QueryOutput::Json(v) = out else {
        panic!("expected JSON output");
    };
    assert_eq!(v["elements"]["nodes"], json!([]));
    assert_eq!(v["elements"]["edges"], json!([]));
    assert_eq!(v["metrics"], json!({}));
    assert_eq!(source.queries().len(), 1);
}

#[tokio::test]
async fn link_query_failure_fails_invocation() {
    let (builder, _) = builder(MemorySource::new().fail("LIMIT", "503 Service Unavailable"));
    let err = builder.build(&socio()).await.unwrap_err();
    assert!(matches!(err, BuilderError::Source(_)));
}

#[tokio::test]
async fn attribute_query_failure_fails_invocation() {
    let (builder, _) = builder(
        MemorySource::new()
            .fail("?id ?name", "timeout")
            .respond("LIMIT", vec![link("a", "b")]),
    );
    let err = builder.build(&socio()).await.unwrap_err();
    assert!(matches!(err, BuilderError::Source(_)));
}

#[tokio::test]
async fn directed_cycle_degrees() {
    let (builder, _) = builder(MemorySource::new().respond(
        "LIMIT",
        vec![link("A", "B"), link("B", "C"), link("C", "D"), link("D", "A")],
    ));

    let net = builder.build(&socio()).await.unwrap();

    for id in ["A", "B", "C", "D"] {
        assert_eq!(attr(&net, id, "in_degree"), Some(&FieldValue::Integer(1)));
        assert_eq!(attr(&net, id, "out_degree"), Some(&FieldValue::Integer(1)));
        assert_eq!(attr(&net, id, "weighted_degree"), Some(&FieldValue::Float(2.0)));
        assert!(attr(&net, id, "distance").is_none());
    }
    assert_eq!(net.metrics["average_degree"], FieldValue::Float(2.0));
    assert_eq!(net.metrics["number_connected_components"], FieldValue::Integer(1));
}

#[tokio::test]
async fn reciprocal_links_follow_dedupe_flag() {
    let script = || MemorySource::new().respond("LIMIT", vec![link("a", "b"), link("b", "a")]);

    let (collapsing, _) = builder(script());
    let net = collapsing.build(&socio()).await.unwrap();
    assert!(net.graph.has_edge("a", "b"));
    assert!(!net.graph.has_edge("b", "a"));

    let (keeping, _) = builder(script());
    let net = keeping
        .build(&socio().with_remove_multiple_links(false))
        .await
        .unwrap();
    assert!(net.graph.has_edge("a", "b"));
    assert!(net.graph.has_edge("b", "a"));
}

#[tokio::test]
async fn small_components_are_dropped() {
    let (builder, _) = builder(MemorySource::new().respond(
        "LIMIT",
        vec![link("a", "b"), link("b", "c"), link("x", "y")],
    ));

    let net = builder.build(&socio().with_limit(3)).await.unwrap();

    assert_eq!(net.graph.node_count(), 3);
    assert!(!net.graph.has_node("x"));
    assert_eq!(net.densify.components_dropped, 1);
}

#[tokio::test]
async fn invalid_params_issue_no_queries() {
    let (builder, source) = builder(MemorySource::new());
    let params = QueryParams::new(ENDPOINT, NODES, SOCIO_LINKS).with_id("X");

    let err = builder.build(&params).await.unwrap_err();

    assert!(matches!(err, BuilderError::Config(_)));
    assert!(source.queries().is_empty());
}

#[tokio::test]
async fn graphml_output_with_invocation_logging() {
    let (builder, _) = builder(MemorySource::new().respond("LIMIT", vec![link("a", "b")]));
    let mut params = socio().with_format(OutputFormat::Graphml);
    params.log_level = Some("debug".parse::<LogLevel>().unwrap());

    let out = builder.query(&params).await.unwrap();

    assert_eq!(out.content_type(), "application/xml");
    let xml = out.into_body();
    assert!(xml.contains(r#"<edge source="a" target="b"/>"#));
    assert!(xml.contains(r#"attr.name="pagerank""#));
}
