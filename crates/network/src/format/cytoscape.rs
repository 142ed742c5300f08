use netbuilder_core::Attributes;
use serde_json::{json, Map, Value};

use super::scalar;
use crate::builder::Network;

const NAME_KEY: &str = "name";

/// Node-link JSON in the shape cytoscape.js loads with `cy.json()`.
pub fn to_cytoscape(network: &Network) -> Value {
    let nodes: Vec<Value> = network
        .graph
        .nodes
        .values()
        .map(|node| {
            let mut data = Map::new();
            data.insert("id".into(), Value::String(node.id.clone()));
            data.insert("value".into(), Value::String(node.id.clone()));
            data.insert("name".into(), Value::String(node.id.clone()));
            extend(&mut data, &node.attributes);
            if let Some(name) = node.attributes.get(NAME_KEY) {
                data.insert("name".into(), Value::String(name.to_string()));
            }
            json!({ "data": data })
        })
        .collect();

    let edges: Vec<Value> = network
        .graph
        .edges
        .values()
        .map(|edge| {
            let mut data = Map::new();
            data.insert("source".into(), Value::String(edge.source.clone()));
            data.insert("target".into(), Value::String(edge.target.clone()));
            extend(&mut data, &edge.attributes);
            json!({ "data": data })
        })
        .collect();

    let mut metrics = Map::new();
    extend(&mut metrics, &network.metrics);

    json!({
        "data": {},
        "directed": true,
        "multigraph": false,
        "elements": { "nodes": nodes, "edges": edges },
        "metrics": metrics,
    })
}

fn extend(target: &mut Map<String, Value>, fields: &Attributes) {
    for (key, value) in fields {
        target.insert(key.clone(), scalar(value));
    }
}
