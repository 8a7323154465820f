//! Property-based invariant tests for the ranking pipeline.
//!
//! For arbitrary finite graphs (cycles, self-loops, duplicate edges and
//! disconnected parts allowed):
//!
//! 1. The effective graph is acyclic after cycle elimination.
//! 2. Every effective edge goes from a higher level to a lower one.
//! 3. Every sink sits on level 1.
//! 4. Depth equals the maximum level and the longest path plus one.
//! 5. Orders within each level form a permutation of 1..=k.
//! 6. Only reversal flags change; original endpoints stay put.
//! 7. Ranking the same graph twice gives the same result.

use erdrank::graph::{AssociationKind, Graph, NodeId};
use erdrank::rank::RankEngine;
use erdrank::rank::cycles::is_acyclic;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (0usize..12).prop_flat_map(|n| {
        let edges = if n == 0 {
            Just(Vec::new()).boxed()
        } else {
            prop::collection::vec((0..n, 0..n), 0..30).boxed()
        };
        (Just(n), edges)
    })
}

fn build(n: usize, edges: &[(usize, usize)]) -> Graph {
    let mut g = Graph::new();
    for i in 0..n {
        g.add_node(format!("T{i}"));
    }
    for &(s, t) in edges {
        g.add_edge(NodeId(s), NodeId(t), AssociationKind::NonIdentifying);
    }
    g
}

/// Longest path (in edges) over effective, non-self-loop edges.
fn longest_path(g: &Graph) -> u32 {
    fn visit(g: &Graph, n: NodeId, memo: &mut Vec<Option<u32>>) -> u32 {
        if let Some(v) = memo[n.0] {
            return v;
        }
        let best = g
            .outgoing_neighbours(n)
            .into_iter()
            .map(|m| visit(g, m, memo) + 1)
            .max()
            .unwrap_or(0);
        memo[n.0] = Some(best);
        best
    }
    let mut memo = vec![None; g.len()];
    g.node_ids().map(|n| visit(g, n, &mut memo)).max().unwrap_or(0)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-4. Acyclicity, monotonic layering, sinks, depth
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layering_invariants((n, edges) in graph_strategy()) {
        let mut g = build(n, &edges);
        let ranking = RankEngine::default().rank(&mut g);

        prop_assert!(is_acyclic(&g));

        for edge in g.edges() {
            if edge.is_self_loop() {
                continue;
            }
            let (from, to) = edge.effective();
            prop_assert!(
                g.level(from) > g.level(to),
                "edge {:?} -> {:?} has levels {} -> {}",
                from, to, g.level(from), g.level(to)
            );
        }

        for sink in g.sinks() {
            prop_assert_eq!(g.level(sink), 1);
        }

        let max_level = g.node_ids().map(|id| g.level(id)).max().unwrap_or(0);
        prop_assert_eq!(ranking.depth, max_level);
        if n > 0 {
            prop_assert_eq!(ranking.depth, longest_path(&g) + 1);
            prop_assert!(g.node_ids().all(|id| g.level(id) >= 1));
        } else {
            prop_assert_eq!(ranking.depth, 0);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Order permutation per level
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn orders_are_permutations((n, edges) in graph_strategy(), sweeps in 0usize..6) {
        let mut g = build(n, &edges);
        let ranking = RankEngine::default().with_sweeps(sweeps).rank(&mut g);

        for level in 1..=ranking.depth {
            let mut orders: Vec<u32> = g.nodes_at_level(level).iter().map(|&id| g.order(id)).collect();
            orders.sort();
            let expected: Vec<u32> = (1..=orders.len() as u32).collect();
            prop_assert_eq!(orders, expected, "level {} is not a permutation", level);
        }

        let total: usize = ranking.rows().iter().map(|row| row.len()).sum();
        prop_assert_eq!(total, n);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Edges are mutated in place, never added or removed
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn original_endpoints_preserved((n, edges) in graph_strategy()) {
        let mut g = build(n, &edges);
        let ranking = RankEngine::default().rank(&mut g);

        prop_assert_eq!(g.edges().len(), edges.len());
        for (edge, &(s, t)) in g.edges().iter().zip(&edges) {
            prop_assert_eq!((edge.source, edge.target), (NodeId(s), NodeId(t)));
        }

        let flagged = g.edges().iter().filter(|e| e.reversed).count();
        prop_assert_eq!(flagged, ranking.reversed_edges.len());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ranking_is_deterministic((n, edges) in graph_strategy()) {
        let engine = RankEngine::default();
        let mut a = build(n, &edges);
        let mut b = build(n, &edges);
        let first = engine.rank(&mut a);
        prop_assert_eq!(&first, &engine.rank(&mut b));
        prop_assert_eq!(&first, &engine.rank(&mut a));
    }
}
