use crate::graph::AssociationKind;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub entities: Vec<Entity>,
    pub associations: Vec<Association>,
    pub views: Vec<View>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub columns: Vec<Column>,
    /// Source line of the declaration
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub typ: String,
    pub pk: bool,
    /// Referenced entity of an `fk -> Entity.column` clause.
    pub fk: Option<String>,
}

/// Explicit association from a `rel` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub source: String,
    pub target: String,
    pub kind: AssociationKind,
    /// Quoted caption (`A -> B : "label"`)
    pub label: Option<String>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub name: String,
    pub includes: Vec<String>,
}
