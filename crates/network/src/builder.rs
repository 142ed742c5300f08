//! The network query pipeline: grow, assemble, densify, measure, format.

use std::sync::Arc;

use netbuilder_compute::{AttributeFetchTask, MetricsEngine};
use netbuilder_core::config::BuilderConfig;
use netbuilder_core::logging::invocation_dispatch;
use netbuilder_core::{Attributes, BuilderError, BuilderResult, QueryParams};
use netbuilder_graph::{densify, node_stubs, DensifyReport, Graph, GraphAssembler};
use netbuilder_source::RecordSource;
use tracing::instrument::WithSubscriber;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::format::{render, QueryOutput};
use crate::grower::NetworkGrower;

/// A densified graph with metrics merged onto its nodes.
#[derive(Debug, Clone)]
pub struct Network {
    pub invocation: Uuid,
    pub graph: Graph,
    /// Graph-level aggregates; empty when the graph has no nodes or edges.
    pub metrics: Attributes,
    pub densify: DensifyReport,
}

/// Runs network queries against one record source.
///
/// Holds no per-query state; concurrent calls are independent.
pub struct NetworkBuilder {
    source: Arc<dyn RecordSource>,
    config: BuilderConfig,
}

impl NetworkBuilder {
    pub fn new(source: Arc<dyn RecordSource>, config: BuilderConfig) -> Self {
        Self { source, config }
    }

    /// Build and encode a network. Runs under an invocation-scoped
    /// subscriber when `params.log_level` is set.
    pub async fn query(&self, params: &QueryParams) -> BuilderResult<QueryOutput> {
        let run = async {
            let network = self.build(params).await?;
            Ok::<_, BuilderError>(render(&network, params.format))
        };
        match params.log_level {
            Some(level) => run.with_subscriber(invocation_dispatch(level)).await,
            None => run.await,
        }
    }

    /// Build the analyzed network without encoding it.
    pub async fn build(&self, params: &QueryParams) -> BuilderResult<Network> {
        params.validate()?;

        let invocation = Uuid::new_v4();
        let mode = if params.is_egocentric() {
            "egocentric"
        } else {
            "sociocentric"
        };
        let span = info_span!("network_query", %invocation, mode);
        self.run(params, invocation).instrument(span).await
    }

    async fn run(&self, params: &QueryParams, invocation: Uuid) -> BuilderResult<Network> {
        let growth = NetworkGrower::new(self.source.as_ref(), params, self.config.ego_max_depth)
            .grow()
            .await?;

        let mut graph = GraphAssembler::new(params.remove_multiple_links)
            .assemble(&node_stubs(&growth.nodes), &growth.links)?;
        let report = densify(&mut graph, params.limit, self.config.trim_max_rounds);

        let fetch = AttributeFetchTask::new(
            Arc::clone(&self.source),
            params.query_text(&params.nodes),
            params.endpoint.clone(),
            params.headers(),
        );
        let engine = MetricsEngine::standard(&self.config, params.seed_ids(), Some(fetch));

        let shared = Arc::new(graph);
        let metrics = engine.run(Arc::clone(&shared)).await?;
        let mut graph = Arc::try_unwrap(shared).unwrap_or_else(|g| (*g).clone());
        metrics.apply_to(&mut graph);

        info!(
            "Network ready: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(Network {
            invocation,
            graph,
            metrics: metrics.per_graph,
            densify: report,
        })
    }
}
