//! Longest-path layer assignment.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::graph::{Graph, NodeId};

/// Assign `level >= 1` to every node so that each effective edge points from
/// a higher level to a lower one. Sinks sit on level 1. Returns the depth.
///
/// The effective graph must be acyclic (see [`super::cycles::break_cycles`]).
pub fn assign_levels(graph: &mut Graph) -> u32 {
    if graph.is_empty() {
        return 0;
    }

    let sinks = graph.sinks();
    let mut depth = 1;
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    let mut queued = vec![false; graph.len()];

    for &sink in &sinks {
        graph.set_level(sink, 1);
    }
    for &sink in &sinks {
        for pred in graph.incoming_neighbours(sink) {
            if !queued[pred.0] {
                queued[pred.0] = true;
                queue.push_back(pred);
            }
        }
    }

    while let Some(n) = queue.pop_front() {
        queued[n.0] = false;
        if graph.level(n) > 0 {
            continue;
        }

        let succ = graph.outgoing_neighbours(n);
        // A node is finalized only after all of its successors; the last
        // successor to finish enqueues it again.
        if succ.iter().any(|&m| graph.level(m) == 0) {
            continue;
        }

        let max = succ.iter().map(|&m| graph.level(m)).max().unwrap_or(0);
        let level = max + 1;
        graph.set_level(n, level);
        depth = depth.max(level);

        for pred in graph.incoming_neighbours(n) {
            if graph.level(pred) == 0 && !queued[pred.0] {
                queued[pred.0] = true;
                queue.push_back(pred);
            }
        }
    }

    for n in 0..graph.len() {
        let n = NodeId(n);
        if graph.level(n) == 0 {
            warn!(node = %graph.node(n).key, "node not reached by layering, placing on level 1");
            graph.set_level(n, 1);
        }
    }

    debug!(depth, sinks = sinks.len(), "levels assigned");
    depth
}
