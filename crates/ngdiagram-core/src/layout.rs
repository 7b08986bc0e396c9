//! Level assignment for top-down hierarchical layout.
//!
//! Edges point from dependent to dependency, so a node's level is the
//! length of the longest path reaching it from any root (a node nothing
//! points into). Every node ends up strictly below all of its dependents.
//!
//! Levels are relaxed once per node in topological order, which keeps the
//! pass linear in the number of edges. A cycle has no topological order and
//! is reported instead of being walked.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, warn};

use crate::error::{DiagramError, Result};
use crate::graph::Diagram;

/// Maps every node id to the ids of the nodes that point into it, in edge order.
/// Edges with an endpoint outside the diagram are skipped, as in layering.
pub fn reverse_edges(diagram: &Diagram) -> HashMap<&str, Vec<&str>> {
    let mut parents: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in diagram.edges() {
        if !diagram.contains(&edge.from) || !diagram.contains(&edge.to) {
            continue;
        }
        parents
            .entry(edge.to.as_str())
            .or_default()
            .push(edge.from.as_str());
    }
    parents
}

/// Ids of nodes with no incoming edges.
pub fn roots(diagram: &Diagram) -> Vec<&str> {
    let parents = reverse_edges(diagram);
    diagram
        .nodes()
        .iter()
        .filter(|n| !parents.contains_key(n.id.as_str()))
        .map(|n| n.id.as_str())
        .collect()
}

/// Mirror the diagram into petgraph. Node `i` is the diagram's `i`-th node.
fn to_digraph(diagram: &Diagram) -> DiGraph<(), ()> {
    let mut graph = DiGraph::with_capacity(diagram.node_count(), diagram.edge_count());
    for _ in diagram.nodes() {
        graph.add_node(());
    }

    for edge in diagram.edges() {
        match (diagram.position(&edge.from), diagram.position(&edge.to)) {
            (Some(from), Some(to)) => {
                graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            }
            _ => debug!("Ignoring edge {} with unknown endpoint", edge.id),
        }
    }

    graph
}

/// Compute levels for every node, indexed like `diagram.nodes()`.
pub fn compute_levels(diagram: &Diagram) -> Result<Vec<u32>> {
    let graph = to_digraph(diagram);

    let order = toposort(&graph, None).map_err(|cycle| {
        let node = diagram.nodes()[cycle.node_id().index()].id.clone();
        warn!("Cycle detected while layering at {}", node);
        DiagramError::CyclicDependencyDetected { node }
    })?;

    let mut levels = vec![0u32; diagram.node_count()];
    for idx in order {
        let below = levels[idx.index()] + 1;
        for child in graph.neighbors_directed(idx, Direction::Outgoing) {
            let level = &mut levels[child.index()];
            *level = (*level).max(below);
        }
    }

    Ok(levels)
}

/// Write computed levels back onto the diagram's nodes.
pub fn assign_levels(diagram: &mut Diagram) -> Result<()> {
    let levels = compute_levels(diagram)?;
    for (node, level) in diagram.nodes_mut().iter_mut().zip(levels) {
        node.level = level;
    }
    Ok(())
}

/// Node ids grouped by level, shallowest first, insertion order within a level.
pub fn layers(diagram: &Diagram) -> Vec<Vec<&str>> {
    let mut layers: Vec<Vec<&str>> = Vec::new();
    for node in diagram.nodes() {
        let level = node.level as usize;
        if layers.len() <= level {
            layers.resize_with(level + 1, Vec::new);
        }
        layers[level].push(node.id.as_str());
    }
    layers
}
