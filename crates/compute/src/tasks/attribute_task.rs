use std::sync::Arc;

use netbuilder_core::{iri_list, FieldValue, ID_SET_PLACEHOLDER};
use netbuilder_graph::Graph;
use netbuilder_source::{RecordSource, SourceHeaders};
use tracing::{debug, warn};

use crate::task::{MetricError, PartialMetrics};

const ID_FIELD: &str = "id";

/// Fetches extra node attributes from the record source in one query.
///
/// The query text has every `<ID_SET>` replaced by the graph's node ids.
/// Returned rows are keyed by their `id` field; rows for ids outside the
/// graph are ignored.
pub struct AttributeFetchTask {
    source: Arc<dyn RecordSource>,
    query: String,
    endpoint: String,
    headers: SourceHeaders,
}

impl AttributeFetchTask {
    /// `query` is the full query text, prefixes included.
    pub fn new(
        source: Arc<dyn RecordSource>,
        query: String,
        endpoint: String,
        headers: SourceHeaders,
    ) -> Self {
        Self {
            source,
            query,
            endpoint,
            headers,
        }
    }

    pub fn name(&self) -> &str {
        "attribute_fetch"
    }

    /// Render the query for the given graph.
    pub fn render(&self, graph: &Graph) -> String {
        let ids = iri_list(graph.nodes.keys().map(String::as_str));
        self.query.replace(ID_SET_PLACEHOLDER, &ids)
    }

    pub async fn fetch(&self, graph: &Graph) -> Result<PartialMetrics, MetricError> {
        let mut out = PartialMetrics::default();
        if graph.is_empty() {
            debug!("Graph is empty, skipping attribute query");
            return Ok(out);
        }

        let text = self.render(graph);
        let rows = self
            .source
            .query(&text, &self.endpoint, &self.headers)
            .await
            .map_err(|e| MetricError::Source(e.to_string()))?;

        let mut matched = 0usize;
        for row in rows {
            let Some(id) = row.get(ID_FIELD).map(FieldValue::to_string) else {
                warn!("Attribute row without an id field, skipping");
                continue;
            };
            if !graph.has_node(&id) {
                continue;
            }
            matched += 1;
            for (key, value) in row {
                if key != ID_FIELD {
                    out.set_node(&id, &key, value);
                }
            }
        }

        debug!("Attribute query matched {} rows", matched);
        Ok(out)
    }
}
