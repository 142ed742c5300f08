//! Node set expansion.
//!
//! Egocentric growth repeatedly substitutes the current frontier into the
//! link query and takes the endpoints of the returned edges as the next
//! frontier. Sociocentric growth issues the link query once with a row
//! limit.

use indexmap::IndexSet;
use netbuilder_core::{iri_list, BuilderResult, QueryParams, Record, ID_PLACEHOLDER};
use netbuilder_graph::{edge_endpoints, NodeId};
use netbuilder_source::RecordSource;
use tracing::{debug, info};

/// Candidate nodes and the edge records that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Growth {
    pub nodes: Vec<NodeId>,
    pub links: Vec<Record>,
    /// Link queries issued.
    pub iterations: usize,
}

pub struct NetworkGrower<'a> {
    source: &'a dyn RecordSource,
    params: &'a QueryParams,
    max_depth: usize,
}

impl<'a> NetworkGrower<'a> {
    pub fn new(source: &'a dyn RecordSource, params: &'a QueryParams, max_depth: usize) -> Self {
        Self {
            source,
            params,
            max_depth,
        }
    }

    /// Egocentric when the params carry seed ids, sociocentric otherwise.
    pub async fn grow(&self) -> BuilderResult<Growth> {
        let seeds = self.params.seed_ids();
        if seeds.is_empty() {
            self.sociocentric().await
        } else {
            self.egocentric(&seeds).await
        }
    }

    /// Breadth-first expansion from `seeds`.
    ///
    /// Stops when the frontier reaches `floor(limit * optimize)` nodes, when
    /// it stops changing, when it becomes empty, or after `max_depth` link
    /// queries. Returns the final frontier with the edges of the last query
    /// only. An empty final frontier falls back to the seeds with no edges.
    pub async fn egocentric(&self, seeds: &[String]) -> BuilderResult<Growth> {
        let threshold = self.params.fetch_limit();
        let headers = self.params.headers();

        let mut frontier: IndexSet<NodeId> = seeds.iter().cloned().collect();
        let mut links = Vec::new();
        let mut iterations = 0usize;

        while iterations < self.max_depth {
            let ids = iri_list(frontier.iter().map(String::as_str));
            let text = self
                .params
                .query_text(&self.params.links.replace(ID_PLACEHOLDER, &ids));
            let rows = self
                .source
                .query(&text, &self.params.endpoint, &headers)
                .await?;
            iterations += 1;

            let next = endpoints(&rows)?;
            debug!(
                "Expansion round {}: {} edges, frontier {} -> {}",
                iterations,
                rows.len(),
                frontier.len(),
                next.len()
            );

            let settled = next.is_empty() || next.len() >= threshold || next == frontier;
            frontier = next;
            links = rows;
            if settled {
                break;
            }
        }

        if frontier.is_empty() {
            info!("Expansion found no edges, falling back to the seed ids");
            return Ok(Growth {
                nodes: seeds.to_vec(),
                links: Vec::new(),
                iterations,
            });
        }

        info!(
            "Egocentric expansion: {} nodes, {} edges after {} rounds",
            frontier.len(),
            links.len(),
            iterations
        );
        Ok(Growth {
            nodes: frontier.into_iter().collect(),
            links,
            iterations,
        })
    }

    /// One link query limited to `floor(limit * optimize)` rows.
    pub async fn sociocentric(&self) -> BuilderResult<Growth> {
        let body = format!("{} LIMIT {}", self.params.links, self.params.fetch_limit());
        let text = self.params.query_text(&body);
        let links = self
            .source
            .query(&text, &self.params.endpoint, &self.params.headers())
            .await?;
        let nodes: Vec<NodeId> = endpoints(&links)?.into_iter().collect();

        info!("Sociocentric sample: {} nodes, {} edges", nodes.len(), links.len());
        Ok(Growth {
            nodes,
            links,
            iterations: 1,
        })
    }
}

/// Distinct edge endpoints in first-seen order.
fn endpoints(rows: &[Record]) -> BuilderResult<IndexSet<NodeId>> {
    let mut ids = IndexSet::new();
    for row in rows {
        let (source, target) = edge_endpoints(row)?;
        ids.insert(source);
        ids.insert(target);
    }
    Ok(ids)
}
