//! Decoding of `application/sparql-results+json` bodies.

use indexmap::IndexMap;
use netbuilder_core::{FieldValue, Record};
use serde::Deserialize;

use crate::source::SourceError;

const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

#[derive(Deserialize)]
struct ResultSet {
    results: Bindings,
}

#[derive(Deserialize)]
struct Bindings {
    bindings: Vec<IndexMap<String, Term>>,
}

#[derive(Deserialize)]
struct Term {
    value: String,
    #[serde(default)]
    datatype: Option<String>,
}

/// Parse a SPARQL JSON result body into records, one per binding row.
///
/// Unbound variables are absent from the row.
pub fn parse_sparql_results(body: &str) -> Result<Vec<Record>, SourceError> {
    let set: ResultSet =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    Ok(set
        .results
        .bindings
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(name, term)| (name, term_value(term)))
                .collect()
        })
        .collect())
}

/// Numeric literals become numbers; everything else (IRIs, plain and
/// language-tagged literals, other datatypes) stays text. A literal that
/// does not parse as its declared type also stays text.
fn term_value(term: Term) -> FieldValue {
    match term.datatype.as_deref() {
        Some(XSD_DECIMAL) => term
            .value
            .parse::<f64>()
            .map(FieldValue::Float)
            .unwrap_or(FieldValue::Text(term.value)),
        Some(XSD_INTEGER) => term
            .value
            .parse::<i64>()
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Text(term.value)),
        _ => FieldValue::Text(term.value),
    }
}
