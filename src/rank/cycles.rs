//! Cycle elimination by reversing DFS back edges.

use tracing::trace;

use crate::graph::{EdgeId, Graph, NodeId};

/// Make the effective graph acyclic. Returns the edges that were reversed,
/// self-loops included.
///
/// Every start node and every incident edge is visited in insertion order,
/// so the result is deterministic for a given graph.
pub fn break_cycles(graph: &mut Graph) -> Vec<EdgeId> {
    graph.set_marked(false);

    let mut reversed = Vec::new();
    let mut on_path = vec![false; graph.len()];

    // Self-loops never take part in layering.
    for e in 0..graph.edges().len() {
        let id = EdgeId(e);
        if graph.edge(id).is_self_loop() && !graph.edge(id).reversed {
            graph.set_reversed(id, true);
            reversed.push(id);
        }
    }

    for start in 0..graph.len() {
        let start = NodeId(start);
        if graph.is_marked(start) {
            continue;
        }

        // (node, index of the next incident edge to inspect)
        let mut stack: Vec<(NodeId, usize)> = vec![(start, 0)];
        graph.mark(start);
        on_path[start.0] = true;

        while let Some(top) = stack.last_mut() {
            let (u, cursor) = *top;
            top.1 += 1;
            let Some(&e) = graph.incident_edges(u).get(cursor) else {
                on_path[u.0] = false;
                stack.pop();
                continue;
            };

            let edge = graph.edge(e);
            if edge.is_self_loop() {
                continue;
            }
            let (from, to) = edge.effective();
            if from != u {
                continue;
            }

            if on_path[to.0] {
                trace!(edge = e.0, from = from.0, to = to.0, "reversing back edge");
                graph.set_reversed(e, !graph.edge(e).reversed);
                reversed.push(e);
            } else if !graph.is_marked(to) {
                graph.mark(to);
                on_path[to.0] = true;
                stack.push((to, 0));
            }
        }
    }

    reversed
}

/// True when the effective graph, ignoring self-loops, has no directed cycle.
pub fn is_acyclic(graph: &Graph) -> bool {
    // Kahn's algorithm over effective edges.
    let mut in_degree = vec![0usize; graph.len()];
    for edge in graph.edges() {
        if !edge.is_self_loop() {
            let (_, to) = edge.effective();
            in_degree[to.0] += 1;
        }
    }

    let mut ready: Vec<NodeId> = graph.node_ids().filter(|n| in_degree[n.0] == 0).collect();
    let mut seen = 0;
    while let Some(n) = ready.pop() {
        seen += 1;
        for &e in graph.incident_edges(n) {
            let edge = graph.edge(e);
            if edge.is_self_loop() {
                continue;
            }
            let (from, to) = edge.effective();
            if from == n {
                in_degree[to.0] -= 1;
                if in_degree[to.0] == 0 {
                    ready.push(to);
                }
            }
        }
    }

    seen == graph.len()
}
