//! Ranking engine: runs the three layering phases in order.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::{Level, debug, debug_span, enabled};

use crate::graph::Graph;

use super::cycles::break_cycles;
use super::levels::assign_levels;
use super::ordering::{count_crossings, initial_order, reduce_crossings};
use super::types::{EdgeResult, Placement, Ranking};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct RankEngine {
    pub(crate) sweeps: usize,
    pub(crate) cancel: Option<Arc<AtomicBool>>,
}

impl Default for RankEngine {
    fn default() -> Self {
        Self {
            sweeps: 5,
            cancel: None,
        }
    }
}

impl RankEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full down+up barycenter passes.
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    /// Flag polled between sweeps. Setting it stops crossing reduction early
    /// with the order reached so far.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Compute level and order for every node of `graph`.
    ///
    /// The graph is reset first, then mutated in place: edges that close
    /// cycles come back with `reversed` set.
    pub fn rank(&self, graph: &mut Graph) -> Ranking {
        let _span = debug_span!("rank", nodes = graph.len(), edges = graph.edges().len()).entered();
        graph.reset();

        // Phase 1: cycle elimination
        let reversed_edges = break_cycles(graph);
        debug!(reversed = reversed_edges.len(), "cycles broken");

        // Phase 2: layer assignment
        let depth = assign_levels(graph);

        // Phase 3: crossing reduction
        initial_order(graph, depth);
        // Counting is quadratic in the edge count; only pay for it when logged.
        let before = enabled!(Level::DEBUG).then(|| count_crossings(graph));
        let stats = reduce_crossings(graph, depth, self.sweeps, self.cancel.as_deref());
        if let Some(before) = before {
            debug!(
                before,
                after = count_crossings(graph),
                sweeps = stats.sweeps_run,
                cancelled = stats.cancelled,
                "crossings reduced"
            );
        }

        let placements = graph
            .node_ids()
            .map(|n| Placement {
                entity: graph.node(n).key.clone(),
                level: graph.level(n),
                order: graph.order(n),
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|e| EdgeResult {
                source: graph.node(e.source).key.clone(),
                target: graph.node(e.target).key.clone(),
                kind: e.kind,
                label: e.label.clone(),
                reversed: e.reversed,
            })
            .collect();

        Ranking {
            depth,
            placements,
            edges,
            reversed_edges,
            sweeps_run: stats.sweeps_run,
            cancelled: stats.cancelled,
        }
    }
}
