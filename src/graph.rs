//! Arena graph of diagram entities and associations.
//!
//! Nodes and edges are addressed by dense indices. Per-node layout state
//! (`level`, `order`, `marked`) lives in arrays indexed by [`NodeId`], so a
//! ranking run is a sequence of passes over plain data.

use serde::Serialize;

/// Index of a node in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Index of an edge in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub usize);

/// Logical constraint kind of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    Identifying,
    #[default]
    NonIdentifying,
    Inheritance,
}

impl AssociationKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "identifying" => Some(Self::Identifying),
            "non_identifying" => Some(Self::NonIdentifying),
            "inheritance" => Some(Self::Inheritance),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifying => "identifying",
            Self::NonIdentifying => "non_identifying",
            Self::Inheritance => "inheritance",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Identity of the owning diagram entity.
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct Edge {
    /// Original association source.
    pub source: NodeId,
    /// Original association target.
    pub target: NodeId,
    pub kind: AssociationKind,
    /// Caption of an explicit association, carried through to the output.
    pub label: Option<String>,
    /// Set when cycle elimination flipped the edge for layering.
    pub reversed: bool,
}

impl Edge {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Source and target as seen by the layering passes.
    pub fn effective(&self) -> (NodeId, NodeId) {
        if self.reversed {
            (self.target, self.source)
        } else {
            (self.source, self.target)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Node -> edges touching it, in insertion order.
    incident: Vec<Vec<EdgeId>>,
    level: Vec<u32>,
    order: Vec<u32>,
    marked: Vec<bool>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, key: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { key: key.into() });
        self.incident.push(Vec::new());
        self.level.push(0);
        self.order.push(0);
        self.marked.push(false);
        id
    }

    /// Add a directed association. Duplicates are kept.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint was not created by this graph.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, kind: AssociationKind) -> EdgeId {
        assert!(
            source.0 < self.nodes.len() && target.0 < self.nodes.len(),
            "edge endpoint out of range: {:?} -> {:?}",
            source,
            target
        );
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            source,
            target,
            kind,
            label: None,
            reversed: false,
        });
        self.incident[source.0].push(id);
        if target != source {
            self.incident[target.0].push(id);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by entity key.
    pub fn find(&self, key: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.key == key).map(NodeId)
    }

    pub fn incident_edges(&self, id: NodeId) -> &[EdgeId] {
        &self.incident[id.0]
    }

    pub fn set_label(&mut self, id: EdgeId, label: impl Into<String>) {
        self.edges[id.0].label = Some(label.into());
    }

    pub(crate) fn set_reversed(&mut self, id: EdgeId, reversed: bool) {
        self.edges[id.0].reversed = reversed;
    }

    /// Distinct targets of effective edges leaving `id`.
    pub fn outgoing_neighbours(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbours(id, |edge| {
            let (from, to) = edge.effective();
            (from == id).then_some(to)
        })
    }

    /// Distinct sources of effective edges entering `id`.
    pub fn incoming_neighbours(&self, id: NodeId) -> Vec<NodeId> {
        self.neighbours(id, |edge| {
            let (from, to) = edge.effective();
            (to == id).then_some(from)
        })
    }

    fn neighbours(&self, id: NodeId, pick: impl Fn(&Edge) -> Option<NodeId>) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        for &e in &self.incident[id.0] {
            let edge = &self.edges[e.0];
            if edge.is_self_loop() {
                continue;
            }
            if let Some(other) = pick(edge) {
                if !out.contains(&other) {
                    out.push(other);
                }
            }
        }
        out
    }

    /// Opposite endpoint of every incident edge, duplicates included.
    pub fn adjacent(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incident[id.0].iter().filter_map(move |&e| {
            let edge = &self.edges[e.0];
            if edge.is_self_loop() {
                None
            } else if edge.source == id {
                Some(edge.target)
            } else {
                Some(edge.source)
            }
        })
    }

    /// Nodes without effective outgoing edges.
    pub fn sinks(&self) -> Vec<NodeId> {
        self.node_ids()
            .filter(|&n| {
                !self.incident[n.0].iter().any(|&e| {
                    let edge = &self.edges[e.0];
                    !edge.is_self_loop() && edge.effective().0 == n
                })
            })
            .collect()
    }

    pub fn nodes_at_level(&self, level: u32) -> Vec<NodeId> {
        self.node_ids().filter(|&n| self.level[n.0] == level).collect()
    }

    pub fn set_marked(&mut self, marked: bool) {
        self.marked.iter_mut().for_each(|m| *m = marked);
    }

    pub fn is_marked(&self, id: NodeId) -> bool {
        self.marked[id.0]
    }

    pub(crate) fn mark(&mut self, id: NodeId) {
        self.marked[id.0] = true;
    }

    pub fn level(&self, id: NodeId) -> u32 {
        self.level[id.0]
    }

    pub(crate) fn set_level(&mut self, id: NodeId, level: u32) {
        self.level[id.0] = level;
    }

    pub fn order(&self, id: NodeId) -> u32 {
        self.order[id.0]
    }

    pub(crate) fn set_order(&mut self, id: NodeId, order: u32) {
        self.order[id.0] = order;
    }

    /// Highest assigned level; 0 for an empty graph.
    pub fn depth(&self) -> u32 {
        self.level.iter().copied().max().unwrap_or(0)
    }

    /// Clear results of a previous run and restore original edge directions.
    pub fn reset(&mut self) {
        self.level.iter_mut().for_each(|l| *l = 0);
        self.order.iter_mut().for_each(|o| *o = 0);
        self.set_marked(false);
        self.edges.iter_mut().for_each(|e| e.reversed = false);
    }
}
