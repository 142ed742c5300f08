use std::sync::Arc;
use std::time::{Duration, Instant};

use netbuilder_core::config::BuilderConfig;
use netbuilder_graph::Graph;
use tokio::task::JoinSet;
use tracing::instrument::WithSubscriber;
use tracing::{debug, dispatcher, info, warn, Instrument, Span};

use crate::state::MetricsResult;
use crate::task::{ComputeTask, MetricError, PartialMetrics};
use crate::tasks::{AttributeFetchTask, DegreeTask, EgoDistanceTask, GraphMetricsTask, PageRankTask};

type SlotOutput = (usize, Result<PartialMetrics, MetricError>);

/// Runs every metric task concurrently against one graph snapshot and
/// merges their outputs.
///
/// CPU tasks run on blocking worker threads, the attribute fetch runs on the
/// async runtime. The caller waits for all of them; the first failure fails
/// the whole run. Outputs are merged in registration order with the attribute
/// fetch last, so the result does not depend on completion order.
pub struct MetricsEngine {
    tasks: Vec<Arc<dyn ComputeTask>>,
    fetch: Option<Arc<AttributeFetchTask>>,
    timeout: Option<Duration>,
}

impl MetricsEngine {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            tasks: Vec::new(),
            fetch: None,
            timeout,
        }
    }

    /// PageRank, degrees, ego distances (when `egos` is non-empty) and graph
    /// aggregates, plus the attribute fetch when given.
    pub fn standard(
        config: &BuilderConfig,
        egos: Vec<String>,
        fetch: Option<AttributeFetchTask>,
    ) -> Self {
        let mut engine = Self::new(config.metrics_timeout())
            .with_task(PageRankTask::from_config(config))
            .with_task(DegreeTask);
        if !egos.is_empty() {
            engine = engine.with_task(EgoDistanceTask::new(egos));
        }
        engine = engine.with_task(GraphMetricsTask);
        match fetch {
            Some(f) => engine.with_fetch(f),
            None => engine,
        }
    }

    pub fn with_task(mut self, task: impl ComputeTask + 'static) -> Self {
        self.tasks.push(Arc::new(task));
        self
    }

    pub fn with_fetch(mut self, fetch: AttributeFetchTask) -> Self {
        self.fetch = Some(Arc::new(fetch));
        self
    }

    /// Names of the registered tasks, in merge order.
    pub fn task_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.iter().map(|t| t.name()).collect();
        if let Some(fetch) = &self.fetch {
            names.push(fetch.name());
        }
        names
    }

    pub async fn run(&self, graph: Arc<Graph>) -> Result<MetricsResult, MetricError> {
        let start = Instant::now();
        let span = Span::current();
        let dispatch = dispatcher::get_default(|d| d.clone());

        let mut set: JoinSet<SlotOutput> = JoinSet::new();
        for (slot, task) in self.tasks.iter().enumerate() {
            let task = Arc::clone(task);
            let graph = Arc::clone(&graph);
            let span = span.clone();
            let dispatch = dispatch.clone();
            set.spawn_blocking(move || {
                dispatcher::with_default(&dispatch, || {
                    span.in_scope(|| {
                        let task_start = Instant::now();
                        let out = task.compute(&graph);
                        debug!(
                            "Metric task {} finished in {:.3}s",
                            task.name(),
                            task_start.elapsed().as_secs_f64()
                        );
                        (slot, out)
                    })
                })
            });
        }

        let slots = self.tasks.len() + usize::from(self.fetch.is_some());
        if let Some(fetch) = &self.fetch {
            let fetch = Arc::clone(fetch);
            let graph = Arc::clone(&graph);
            let slot = slots - 1;
            set.spawn(
                async move { (slot, fetch.fetch(&graph).await) }
                    .instrument(span.clone())
                    .with_subscriber(dispatch.clone()),
            );
        }

        info!("Computing metrics with {} workers", slots);

        let mut partials: Vec<Option<PartialMetrics>> = (0..slots).map(|_| None).collect();
        let failure = match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, drain(&mut set, &mut partials)).await {
                    Ok(failure) => failure,
                    Err(_) => {
                        // Only the async fetch can be cancelled. Blocking workers
                        // run to completion detached and their output is dropped.
                        set.abort_all();
                        warn!("Metrics did not complete within {:?}", limit);
                        return Err(MetricError::TimedOut(limit));
                    }
                }
            }
            None => drain(&mut set, &mut partials).await,
        };
        if let Some(e) = failure {
            warn!("Metrics failed: {}", e);
            return Err(e);
        }

        let mut result = MetricsResult::for_graph(&graph);
        for partial in partials.into_iter().flatten() {
            result.absorb(partial);
        }

        info!(
            "Metrics complete in {:.3}s",
            start.elapsed().as_secs_f64()
        );
        Ok(result)
    }
}

/// Wait for every worker. Returns the first failure seen, if any.
async fn drain(
    set: &mut JoinSet<SlotOutput>,
    partials: &mut [Option<PartialMetrics>],
) -> Option<MetricError> {
    let mut failure = None;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((slot, Ok(partial))) => partials[slot] = Some(partial),
            Ok((_, Err(e))) => {
                failure.get_or_insert(e);
            }
            Err(e) => {
                failure.get_or_insert(MetricError::Join(e.to_string()));
            }
        }
    }
    failure
}

#[cfg(test)]
mod tests {
    use netbuilder_core::{record, FieldValue};
    use netbuilder_source::{MemorySource, SourceHeaders};

    use super::*;
    use crate::state::keys;

    fn cycle() -> Arc<Graph> {
        let mut g = Graph::new();
        g.add_edge("a", "b");
        g.add_edge("b", "c");
        g.add_edge("c", "d");
        g.add_edge("d", "a");
        Arc::new(g)
    }

    struct Failing;

    impl ComputeTask for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn compute(&self, _graph: &Graph) -> Result<PartialMetrics, MetricError> {
            Err(MetricError::Failed {
                task: self.name().to_string(),
                reason: "boom".to_string(),
            })
        }
    }

    struct Slow;

    impl ComputeTask for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        fn compute(&self, _graph: &Graph) -> Result<PartialMetrics, MetricError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(PartialMetrics::default())
        }
    }

    fn fetch_task(source: MemorySource) -> AttributeFetchTask {
        AttributeFetchTask::new(
            Arc::new(source),
            "SELECT ?id ?label WHERE { VALUES ?id { <ID_SET> } }".to_string(),
            "http://example.org/sparql".to_string(),
            SourceHeaders::new(),
        )
    }

    #[tokio::test]
    async fn standard_metrics_on_cycle() {
        let engine = MetricsEngine::standard(&BuilderConfig::default(), vec!["a".into()], None);
        let result = engine.run(cycle()).await.unwrap();

        assert_eq!(result.per_node.len(), 4);
        for fields in result.per_node.values() {
            assert_eq!(fields[keys::IN_DEGREE], FieldValue::Integer(1));
            assert_eq!(fields[keys::OUT_DEGREE], FieldValue::Integer(1));
            assert_eq!(fields[keys::DEGREE], FieldValue::Integer(2));
            let pr = fields[keys::PAGERANK].as_f64().unwrap();
            assert!((pr - 0.25).abs() < 1e-6);
        }
        assert_eq!(result.per_node["a"][keys::DISTANCE], FieldValue::Integer(0));
        assert_eq!(result.per_node["c"][keys::DISTANCE], FieldValue::Integer(2));
        assert_eq!(result.per_graph[keys::DIAMETER], FieldValue::Integer(2));
        assert_eq!(result.per_graph[keys::NUMBER_OF_EDGES], FieldValue::Integer(4));
    }

    #[tokio::test]
    async fn distance_skipped_without_egos() {
        let engine = MetricsEngine::standard(&BuilderConfig::default(), vec![], None);
        assert!(!engine.task_names().contains(&"ego_distance"));

        let result = engine.run(cycle()).await.unwrap();
        assert!(result.per_node["a"].get(keys::DISTANCE).is_none());
    }

    #[tokio::test]
    async fn failing_task_fails_run() {
        let engine = MetricsEngine::new(None).with_task(DegreeTask).with_task(Failing);
        let err = engine.run(cycle()).await.unwrap_err();
        assert!(matches!(err, MetricError::Failed { .. }));
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let engine = MetricsEngine::new(Some(Duration::from_millis(20))).with_task(Slow);
        let err = engine.run(cycle()).await.unwrap_err();
        assert!(matches!(err, MetricError::TimedOut(_)));
    }

    #[tokio::test]
    async fn timeout_does_not_wait_for_blocking_workers() {
        let engine = MetricsEngine::new(Some(Duration::from_millis(20)))
            .with_task(Slow)
            .with_task(DegreeTask);
        let start = Instant::now();
        let err = engine.run(cycle()).await.unwrap_err();
        assert!(matches!(err, MetricError::TimedOut(_)));
        assert!(start.elapsed() < Duration::from_millis(250));
    }

    #[tokio::test]
    async fn fetched_attributes_merge_last() {
        let source = MemorySource::new().respond(
            "VALUES",
            vec![
                record([("id", FieldValue::from("a")), ("label", "Alpha".into())]),
                record([("id", FieldValue::from("zz")), ("label", "Ghost".into())]),
                record([("label", FieldValue::from("No id"))]),
                record([("id", FieldValue::from("b")), ("degree", 99i64.into())]),
            ],
        );
        let engine = MetricsEngine::new(None)
            .with_task(DegreeTask)
            .with_fetch(fetch_task(source));

        let result = engine.run(cycle()).await.unwrap();
        assert_eq!(result.per_node["a"]["label"], FieldValue::from("Alpha"));
        assert!(result.per_node["a"].get("id").is_none());
        assert!(!result.per_node.contains_key("zz"));
        assert_eq!(result.per_node["b"][keys::DEGREE], FieldValue::Integer(99));
    }

    #[tokio::test]
    async fn fetch_query_lists_node_ids() {
        let task = fetch_task(MemorySource::new());
        let text = task.render(&cycle());
        assert!(text.contains("VALUES ?id { <a> <b> <c> <d> }"));
    }

    #[tokio::test]
    async fn fetch_failure_is_source_error() {
        let source = MemorySource::new().fail("VALUES", "endpoint down");
        let engine = MetricsEngine::new(None).with_fetch(fetch_task(source));
        let err = engine.run(cycle()).await.unwrap_err();
        assert!(matches!(err, MetricError::Source(_)));
    }

    #[tokio::test]
    async fn fetch_skipped_for_empty_graph() {
        let engine = MetricsEngine::new(None)
            .with_fetch(fetch_task(MemorySource::new().fail("VALUES", "unreachable")));
        let result = engine.run(Arc::new(Graph::new())).await.unwrap();
        assert!(result.per_node.is_empty());
        assert!(result.per_graph.is_empty());
    }
}
