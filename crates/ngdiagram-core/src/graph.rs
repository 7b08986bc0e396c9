//! Diagram graph: an ordered node list plus an append-only edge list

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::NodeCategory;

/// A single vertex of the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramNode {
    /// Entity name; unique within a diagram.
    pub id: String,
    pub label: String,
    /// Serialized as `group`, the key the network renderer styles by.
    #[serde(rename = "group")]
    pub category: NodeCategory,
    /// Longest-path depth from any root. Zero until layering has run.
    pub level: u32,
}

impl DiagramNode {
    pub fn new(name: impl Into<String>, category: NodeCategory) -> Self {
        let id = name.into();
        DiagramNode {
            label: id.clone(),
            id,
            category,
            level: 0,
        }
    }
}

/// Which entity field produced an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Module lists the target in its imports.
    Imports,
    /// Module lists the target component in its declarations.
    Declares,
    /// Component constructor injects the target.
    Injects,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeKind::Imports => "imports",
            EdgeKind::Declares => "declares",
            EdgeKind::Injects => "injects",
        };
        f.write_str(s)
    }
}

/// A directed "depends on" edge, pointing from dependent to dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    /// Always `"<from>-><to>"`; not unique when a pair is linked twice.
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

impl DiagramEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: EdgeKind) -> Self {
        let from = from.into();
        let to = to.into();
        DiagramEdge {
            id: edge_id(&from, &to),
            from,
            to,
            kind,
        }
    }
}

/// Deterministic edge identifier for a `(from, to)` pair.
pub fn edge_id(from: &str, to: &str) -> String {
    format!("{from}->{to}")
}

/// The built diagram. Nodes are unique by id; edges are kept in insertion
/// order and never deduplicated.
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct Diagram {
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl fmt::Debug for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagram")
            .field("node_count", &self.nodes.len())
            .field("edge_count", &self.edges.len())
            .finish()
    }
}

impl Diagram {
    pub fn new() -> Self {
        Diagram::default()
    }

    /// Add a node unless one with the same id exists. Returns whether it was added.
    pub fn add_node(&mut self, node: DiagramNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Append an edge. Endpoints are not checked.
    pub fn add_edge(&mut self, edge: DiagramEdge) {
        self.edges.push(edge);
    }

    /// Get a node by id.
    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Position of a node in insertion order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [DiagramNode] {
        &mut self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes of a specific category.
    pub fn nodes_of_category(&self, category: NodeCategory) -> impl Iterator<Item = &DiagramNode> {
        self.nodes.iter().filter(move |n| n.category == category)
    }

    /// Outgoing edges of a node.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DiagramEdge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    /// Incoming edges of a node.
    pub fn edges_to<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DiagramEdge> {
        self.edges.iter().filter(move |e| e.to == id)
    }

    /// Level of a node, if present.
    pub fn level(&self, id: &str) -> Option<u32> {
        self.node(id).map(|n| n.level)
    }

    /// Deepest level in the diagram.
    pub fn max_level(&self) -> u32 {
        self.nodes.iter().map(|n| n.level).max().unwrap_or(0)
    }
}
