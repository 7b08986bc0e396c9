//! Category filtering over a built diagram

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::{Diagram, DiagramEdge, DiagramNode};
use crate::model::NodeCategory;

/// What to do with edges whose endpoint was filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgePolicy {
    /// Forward every edge unchanged; the renderer skips dangling ones.
    #[default]
    Passthrough,
    /// Drop edges that reference a removed node.
    DropDangling,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub exclude: BTreeSet<NodeCategory>,
    #[serde(default)]
    pub edges: EdgePolicy,
}

impl FilterOptions {
    pub fn excluding<I: IntoIterator<Item = NodeCategory>>(categories: I) -> Self {
        FilterOptions {
            exclude: categories.into_iter().collect(),
            edges: EdgePolicy::default(),
        }
    }

    pub fn with_edge_policy(mut self, edges: EdgePolicy) -> Self {
        self.edges = edges;
        self
    }
}

/// A reduced, owned view of a diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredGraph {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

/// Drop nodes whose category is excluded. Levels are carried over as built.
pub fn filter_graph(diagram: &Diagram, options: &FilterOptions) -> FilteredGraph {
    let nodes: Vec<DiagramNode> = diagram
        .nodes()
        .iter()
        .filter(|n| !options.exclude.contains(&n.category))
        .cloned()
        .collect();

    let edges = match options.edges {
        EdgePolicy::Passthrough => diagram.edges().to_vec(),
        EdgePolicy::DropDangling => {
            let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
            diagram
                .edges()
                .iter()
                .filter(|e| kept.contains(e.from.as_str()) && kept.contains(e.to.as_str()))
                .cloned()
                .collect()
        }
    };

    FilteredGraph { nodes, edges }
}
