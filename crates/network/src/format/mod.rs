//! Result encodings.

mod cytoscape;
mod graphml;

use netbuilder_core::{FieldValue, OutputFormat};
use serde_json::Value;

use crate::builder::Network;

pub use cytoscape::to_cytoscape;
pub use graphml::to_graphml;

/// An encoded network, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Json(Value),
    Markup(String),
}

impl QueryOutput {
    pub fn content_type(&self) -> &'static str {
        match self {
            QueryOutput::Json(_) => "application/json",
            QueryOutput::Markup(_) => "application/xml",
        }
    }

    pub fn into_body(self) -> String {
        match self {
            QueryOutput::Json(v) => v.to_string(),
            QueryOutput::Markup(s) => s,
        }
    }
}

pub fn render(network: &Network, format: OutputFormat) -> QueryOutput {
    match format {
        OutputFormat::Cytoscape => QueryOutput::Json(to_cytoscape(network)),
        OutputFormat::Graphml => QueryOutput::Markup(to_graphml(&network.graph)),
    }
}

/// JSON scalar for a field value. Non-finite floats become `null`.
pub(crate) fn scalar(value: &FieldValue) -> Value {
    match value {
        FieldValue::Boolean(b) => Value::Bool(*b),
        FieldValue::Integer(i) => Value::from(*i),
        FieldValue::Float(x) => serde_json::Number::from_f64(*x)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FieldValue::Text(s) => Value::String(s.clone()),
    }
}
