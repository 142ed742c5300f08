//! Graph construction from query records.

use netbuilder_core::{record, BuilderError, BuilderResult, FieldValue, Record};
use tracing::debug;

use crate::store::{Graph, NodeId};

const ID_FIELD: &str = "id";
const SOURCE_FIELD: &str = "source";
const TARGET_FIELD: &str = "target";

/// Builds a directed [`Graph`] from node and edge records.
///
/// Every field other than `id` (nodes) or `source`/`target` (edges) becomes
/// an attribute, attached only to the elements whose record carried it.
#[derive(Debug, Clone, Copy)]
pub struct GraphAssembler {
    remove_multiple_links: bool,
}

impl GraphAssembler {
    /// With `remove_multiple_links`, an edge whose reverse already exists is
    /// dropped so the first-seen direction (and its attributes) wins.
    pub fn new(remove_multiple_links: bool) -> Self {
        Self { remove_multiple_links }
    }

    pub fn assemble(&self, nodes: &[Record], edges: &[Record]) -> BuilderResult<Graph> {
        let mut graph = Graph::new();

        for rec in nodes {
            let id = required_id(rec, ID_FIELD)?;
            let node = graph.add_node(&id);
            for (key, value) in rec.iter().filter(|(k, _)| k.as_str() != ID_FIELD) {
                node.attributes.insert(key.clone(), value.clone());
            }
        }

        let mut collapsed = 0usize;
        for rec in edges {
            let (source, target) = edge_endpoints(rec)?;

            if self.remove_multiple_links && source != target && graph.has_edge(&target, &source) {
                collapsed += 1;
                continue;
            }

            let edge = graph.add_edge(&source, &target);
            for (key, value) in rec
                .iter()
                .filter(|(k, _)| k.as_str() != SOURCE_FIELD && k.as_str() != TARGET_FIELD)
            {
                edge.attributes.insert(key.clone(), value.clone());
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            collapsed,
            "assembled graph"
        );
        Ok(graph)
    }
}

/// Node records carrying only an id.
pub fn node_stubs<'a, I>(ids: I) -> Vec<Record>
where
    I: IntoIterator<Item = &'a NodeId>,
{
    ids.into_iter()
        .map(|id| record([(ID_FIELD, FieldValue::from(id.as_str()))]))
        .collect()
}

/// The `source` and `target` ids of an edge record.
pub fn edge_endpoints(rec: &Record) -> BuilderResult<(NodeId, NodeId)> {
    Ok((required_id(rec, SOURCE_FIELD)?, required_id(rec, TARGET_FIELD)?))
}

fn required_id(rec: &Record, field: &str) -> BuilderResult<NodeId> {
    rec.get(field).map(|v| v.to_string()).ok_or_else(|| {
        BuilderError::MalformedRecord(format!(
            "missing '{}' in record with fields [{}]",
            field,
            rec.keys().cloned().collect::<Vec<_>>().join(", ")
        ))
    })
}
