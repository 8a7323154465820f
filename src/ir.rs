use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::ast::Schema;
use crate::graph::{AssociationKind, Graph};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Unknown view: {0}")]
    UnknownView(String),
    #[error("line {line}: entity {name} declared twice")]
    DuplicateEntity { name: String, line: usize },
    #[error("line {line}: association references undeclared entity {name}")]
    UnknownEntity { name: String, line: usize },
}

/// Entities and associations selected for one diagram, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramIR {
    pub nodes: Vec<String>,
    pub edges: Vec<EdgeIR>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeIR {
    pub from: String,
    pub to: String,
    pub kind: AssociationKind,
    pub label: Option<String>,
}

impl DiagramIR {
    /// Collect the diagram for `view`, or for the whole schema.
    ///
    /// Explicit `rel` associations come first, followed by the ones implied by
    /// `fk` columns. Associations leaving the selected view are dropped.
    pub fn from_schema(schema: &Schema, view: Option<&str>) -> Result<Self, BuildError> {
        let mut declared: HashSet<&str> = HashSet::new();
        for e in &schema.entities {
            if !declared.insert(e.name.as_str()) {
                return Err(BuildError::DuplicateEntity {
                    name: e.name.clone(),
                    line: e.line,
                });
            }
        }

        let included: HashSet<&str> = match view {
            Some(view_name) => schema
                .views
                .iter()
                .find(|v| v.name == view_name)
                .map(|v| v.includes.iter().map(|s| s.as_str()).collect())
                .ok_or_else(|| BuildError::UnknownView(view_name.to_string()))?,
            None => declared.clone(),
        };

        let nodes: Vec<String> = schema
            .entities
            .iter()
            .filter(|e| included.contains(e.name.as_str()))
            .map(|e| e.name.clone())
            .collect();

        let mut candidates: Vec<(&str, &str, AssociationKind, Option<&str>, usize)> = schema
            .associations
            .iter()
            .map(|r| (r.source.as_str(), r.target.as_str(), r.kind, r.label.as_deref(), r.line))
            .collect();

        for entity in &schema.entities {
            for column in &entity.columns {
                if let Some(target) = &column.fk {
                    let kind = if column.pk {
                        AssociationKind::Identifying
                    } else {
                        AssociationKind::NonIdentifying
                    };
                    candidates.push((entity.name.as_str(), target.as_str(), kind, None, entity.line));
                }
            }
        }

        let mut edges = Vec::new();
        for (from, to, kind, label, line) in candidates {
            for name in [from, to] {
                if !declared.contains(name) {
                    return Err(BuildError::UnknownEntity {
                        name: name.to_string(),
                        line,
                    });
                }
            }
            if included.contains(from) && included.contains(to) {
                edges.push(EdgeIR {
                    from: from.to_string(),
                    to: to.to_string(),
                    kind,
                    label: label.map(str::to_string),
                });
            }
        }

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            view = view.unwrap_or("<all>"),
            "diagram collected"
        );
        Ok(DiagramIR { nodes, edges })
    }

    /// Map nodes and edges 1:1 into a layout graph.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        let ids: HashMap<&str, _> = self
            .nodes
            .iter()
            .map(|name| (name.as_str(), graph.add_node(name.clone())))
            .collect();

        for edge in &self.edges {
            // Both endpoints are in `nodes` by construction.
            if let (Some(&from), Some(&to)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str())) {
                let id = graph.add_edge(from, to, edge.kind);
                if let Some(label) = &edge.label {
                    graph.set_label(id, label.clone());
                }
            }
        }

        graph
    }
}
