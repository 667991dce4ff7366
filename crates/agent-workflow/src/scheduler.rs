//! Wave-based DAG scheduler
//!
//! The scheduler repeatedly collects every node whose dependencies have all
//! completed, runs that wave concurrently against a read-only view of the
//! state, and merges the wave's updates in declaration order. The first node
//! failure aborts the run; in-flight siblings are dropped with the wave.

use crate::Graph;
use agent_core::{ConsoleSink, Error, Node, ObservationSink, PartialUpdate, Result, RunState};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Configuration for the scheduler
#[derive(Debug, Clone, Default)]
pub struct SchedulerConfig {
    /// Upper bound on a single node invocation
    pub node_timeout: Option<Duration>,

    /// Maximum nodes in flight within one wave
    pub max_concurrency: Option<usize>,
}

/// Executes a `Graph` over a `RunState`
pub struct Scheduler {
    config: SchedulerConfig,
    sink: Arc<dyn ObservationSink>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    /// Create a scheduler that reports reasoning to stdout
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            sink: Arc::new(ConsoleSink),
        }
    }

    /// Create a new scheduler builder
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::default()
    }

    /// Replace the observation sink
    pub fn with_sink(mut self, sink: Arc<dyn ObservationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run `graph` to completion, starting from `state`
    ///
    /// Returns the final state once the sink has merged. Any node error,
    /// timeout or rejected update aborts the run and is returned tagged with
    /// the node that caused it.
    #[instrument(skip_all, fields(run_id = %state.metadata().run_id, nodes = graph.len()))]
    pub async fn run(&self, graph: &Graph, mut state: RunState) -> Result<RunState> {
        let started = Instant::now();
        let mut completed = vec![false; graph.len()];
        let mut wave = 0usize;

        loop {
            let ready: Vec<usize> = (0..graph.len())
                .filter(|&i| !completed[i])
                .filter(|&i| graph.dependencies_at(i).iter().all(|&d| completed[d]))
                .collect();

            if ready.is_empty() {
                break;
            }
            wave += 1;
            info!(
                wave,
                nodes = ?ready.iter().map(|&i| graph.node_at(i).id().as_str()).collect::<Vec<_>>(),
                "Dispatching wave"
            );

            let updates = self.dispatch_wave(graph, &ready, &state).await?;

            for (idx, update) in updates {
                let node = graph.node_at(idx);
                state
                    .apply(node.id(), update)
                    .map_err(|e| e.in_node(node.id().clone()))?;
                completed[idx] = true;
                self.observe(node.as_ref(), &state);
            }

            if completed[graph.sink_index()] {
                info!(
                    waves = wave,
                    elapsed_ms = started.elapsed().as_millis(),
                    "Workflow completed"
                );
                return Ok(state);
            }
        }

        Err(Error::ProcessingFailed(format!(
            "Workflow stalled before '{}' completed",
            graph.sink()
        )))
    }

    /// Run one wave; results come back in `ready` order
    async fn dispatch_wave(
        &self,
        graph: &Graph,
        ready: &[usize],
        state: &RunState,
    ) -> Result<Vec<(usize, PartialUpdate)>> {
        let limit = self
            .config
            .max_concurrency
            .unwrap_or(ready.len())
            .max(1);
        let mut results: Vec<Option<PartialUpdate>> = ready.iter().map(|_| None).collect();
        let mut pending = ready.iter().enumerate();
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < limit {
                let Some((slot, &idx)) = pending.next() else {
                    break;
                };
                in_flight.push(self.invoke_node(slot, graph.node_at(idx).as_ref(), state));
            }

            match in_flight.next().await {
                Some((slot, Ok(update))) => results[slot] = Some(update),
                Some((_, Err(e))) => {
                    warn!(error = %e, cancelled = in_flight.len(), "Wave aborted");
                    return Err(e);
                }
                None => break,
            }
        }

        Ok(ready
            .iter()
            .copied()
            .zip(results)
            .filter_map(|(idx, update)| update.map(|u| (idx, u)))
            .collect())
    }

    #[instrument(skip_all, fields(node = %node.id()))]
    async fn invoke_node(
        &self,
        slot: usize,
        node: &dyn Node,
        state: &RunState,
    ) -> (usize, Result<PartialUpdate>) {
        let started = Instant::now();
        let invocation = node.invoke(state);

        let outcome = match self.config.node_timeout {
            Some(limit) => tokio::time::timeout(limit, invocation)
                .await
                .unwrap_or_else(|_| {
                    Err(Error::Timeout {
                        node: node.id().clone(),
                        timeout_ms: limit.as_millis(),
                    })
                }),
            None => invocation.await,
        };

        match &outcome {
            Ok(_) => debug!(elapsed_ms = started.elapsed().as_millis(), "Node completed"),
            Err(e) => warn!(error = %e, "Node failed"),
        }

        (slot, outcome.map_err(|e| e.in_node(node.id().clone())))
    }

    fn observe(&self, node: &dyn Node, state: &RunState) {
        if !state.metadata().show_reasoning {
            return;
        }
        if let Some(message) = state.message_from(node.id().as_str()) {
            self.sink.observe(node.label(), message.content());
        }
    }
}

/// Builder for constructing schedulers
#[derive(Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    sink: Option<Arc<dyn ObservationSink>>,
}

impl SchedulerBuilder {
    /// Bound every node invocation
    pub fn node_timeout(mut self, timeout: Duration) -> Self {
        self.config.node_timeout = Some(timeout);
        self
    }

    /// Limit nodes in flight per wave
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.config.max_concurrency = Some(limit);
        self
    }

    /// Set the observation sink
    pub fn sink(mut self, sink: Arc<dyn ObservationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the scheduler
    pub fn build(self) -> Scheduler {
        let scheduler = Scheduler::new(self.config);
        match self.sink {
            Some(sink) => scheduler.with_sink(sink),
            None => scheduler,
        }
    }
}
