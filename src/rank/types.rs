//! Result types of a ranking run.

use serde::Serialize;

use crate::graph::{AssociationKind, EdgeId};

/// Level and order of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub entity: String,
    /// 1 = sink layer.
    pub level: u32,
    /// 1-based rank within the level.
    pub order: u32,
}

/// One association, named by its entities in the original direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeResult {
    pub source: String,
    pub target: String,
    pub kind: AssociationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Flipped for layering; a renderer draws it against the level flow.
    pub reversed: bool,
}

/// The complete ranking result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    /// Number of levels; 0 for an empty diagram.
    pub depth: u32,
    /// One entry per node, in insertion order.
    pub placements: Vec<Placement>,
    /// One entry per association, in graph insertion order.
    pub edges: Vec<EdgeResult>,
    /// Edges flipped for layering (self-loops included), as indices into `edges`
    pub reversed_edges: Vec<EdgeId>,
    pub sweeps_run: usize,
    pub cancelled: bool,
}

impl Ranking {
    pub fn placement(&self, entity: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.entity == entity)
    }

    /// Associations flipped for layering, in insertion order.
    pub fn reversed(&self) -> impl Iterator<Item = &EdgeResult> {
        self.edges.iter().filter(|e| e.reversed)
    }

    /// Entity names grouped by level (level 1 first), each row sorted by order.
    pub fn rows(&self) -> Vec<Vec<&str>> {
        (1..=self.depth)
            .map(|level| {
                let mut row: Vec<&Placement> =
                    self.placements.iter().filter(|p| p.level == level).collect();
                row.sort_by_key(|p| p.order);
                row.into_iter().map(|p| p.entity.as_str()).collect()
            })
            .collect()
    }
}
