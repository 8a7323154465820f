//! Barycenter crossing reduction.
//!
//! Each node's sort key is the truncating integer mean of its neighbours'
//! orders. Ties keep the previous relative order through stable sorting, so
//! output is reproducible for a given insertion order.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use crate::graph::{Graph, NodeId};

/// Outcome of [`reduce_crossings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Full down+up passes completed.
    pub sweeps_run: usize,
    pub cancelled: bool,
}

/// Number each level `1..=k` in insertion order.
pub fn initial_order(graph: &mut Graph, depth: u32) {
    for level in 1..=depth {
        for (i, n) in graph.nodes_at_level(level).into_iter().enumerate() {
            graph.set_order(n, i as u32 + 1);
        }
    }
}

/// Run `sweeps` down+up passes over levels `1..=depth`.
///
/// Levels must already be numbered (see [`initial_order`]); the passes start
/// from whatever order the graph holds. `cancel` is polled before every pass;
/// once set the current order is kept.
pub fn reduce_crossings(
    graph: &mut Graph,
    depth: u32,
    sweeps: usize,
    cancel: Option<&AtomicBool>,
) -> SweepStats {
    reduce_crossings_until(graph, depth, sweeps, || {
        cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    })
}

/// Like [`reduce_crossings`], with `stop` checked before every pass.
pub fn reduce_crossings_until(
    graph: &mut Graph,
    depth: u32,
    sweeps: usize,
    mut stop: impl FnMut() -> bool,
) -> SweepStats {
    let mut stats = SweepStats {
        sweeps_run: 0,
        cancelled: false,
    };

    for sweep in 0..sweeps {
        if stop() {
            stats.cancelled = true;
            break;
        }

        for level in 1..=depth {
            reorder_level(graph, level);
        }
        for level in (1..=depth).rev() {
            reorder_level(graph, level);
        }

        stats.sweeps_run += 1;
        trace!(sweep, crossings = count_crossings(graph), "sweep done");
    }

    stats
}

/// Nodes of `level` sorted by their current order.
pub fn level_sequence(graph: &Graph, level: u32) -> Vec<NodeId> {
    let mut nodes = graph.nodes_at_level(level);
    nodes.sort_by_key(|&n| graph.order(n));
    nodes
}

fn barycenter(graph: &Graph, n: NodeId) -> u32 {
    let mut sum: u64 = 0;
    let mut count: u64 = 0;
    for m in graph.adjacent(n) {
        let order = graph.order(m);
        if order > 0 {
            sum += u64::from(order);
            count += 1;
        }
    }
    if count == 0 {
        graph.order(n)
    } else {
        (sum / count) as u32
    }
}

fn reorder_level(graph: &mut Graph, level: u32) {
    let nodes = level_sequence(graph, level);
    if nodes.is_empty() {
        return;
    }

    let mut keyed: Vec<(u32, NodeId)> = nodes.iter().map(|&n| (barycenter(graph, n), n)).collect();
    keyed.sort_by_key(|&(key, _)| key);

    for (i, (_, n)) in keyed.into_iter().enumerate() {
        graph.set_order(n, i as u32 + 1);
    }
}

/// Crossings between adjacent levels, counting only edges that span exactly
/// one level.
pub fn count_crossings(graph: &Graph) -> usize {
    let mut segments: Vec<(u32, u32, u32)> = Vec::new(); // (upper level, upper order, lower order)
    for edge in graph.edges() {
        if edge.is_self_loop() {
            continue;
        }
        let (a, b) = (edge.source, edge.target);
        let (la, lb) = (graph.level(a), graph.level(b));
        if la == lb + 1 {
            segments.push((la, graph.order(a), graph.order(b)));
        } else if lb == la + 1 {
            segments.push((lb, graph.order(b), graph.order(a)));
        }
    }

    let mut crossings = 0;
    for (i, &(level, u1, l1)) in segments.iter().enumerate() {
        for &(other, u2, l2) in &segments[i + 1..] {
            if level == other && ((u1 < u2 && l1 > l2) || (u1 > u2 && l1 < l2)) {
                crossings += 1;
            }
        }
    }
    crossings
}
