//! Graph builder for turning entity lists into a diagram.
//!
//! Building is a three-pass process:
//! 1. Validate that entity names are globally unique and not self-referencing
//! 2. Add one node per entity (modules, then components, then injectables)
//! 3. Resolve named references into edges, fabricating external nodes
//!    for dangling imports and injections

use std::collections::HashMap;

use tracing::debug;

use crate::error::{InvalidEntityModel, Result};
use crate::graph::{Diagram, DiagramEdge, DiagramNode, EdgeKind};
use crate::layout::assign_levels;
use crate::model::{Entity, NodeCategory, ProjectEntities};

/// Builds a [`Diagram`] from one analysis pass worth of entities.
pub struct GraphBuilder<'a> {
    entities: &'a ProjectEntities,
    diagram: Diagram,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(entities: &'a ProjectEntities) -> Self {
        Self {
            entities,
            diagram: Diagram::new(),
        }
    }

    /// Rejects name collisions and self-references before anything is built.
    pub fn validate(&self) -> std::result::Result<(), InvalidEntityModel> {
        let mut seen: HashMap<&str, NodeCategory> = HashMap::new();
        for entity in self.entities.iter() {
            if let Some(&first) = seen.get(entity.name()) {
                return Err(InvalidEntityModel::DuplicateName {
                    name: entity.name().to_string(),
                    first,
                    second: entity.category(),
                });
            }
            seen.insert(entity.name(), entity.category());
        }

        for module in &self.entities.modules {
            let fields = [
                ("imports", &module.imports),
                ("declarations", &module.declarations),
            ];
            for (field, names) in fields {
                if names.iter().any(|n| *n == module.name) {
                    return Err(InvalidEntityModel::SelfReference {
                        name: module.name.clone(),
                        category: module.category(),
                        field,
                    });
                }
            }
        }

        for component in &self.entities.components {
            if component
                .injected_dependencies
                .iter()
                .any(|n| *n == component.name)
            {
                return Err(InvalidEntityModel::SelfReference {
                    name: component.name.clone(),
                    category: component.category(),
                    field: "injectedDependencies",
                });
            }
        }

        Ok(())
    }

    /// Adds one node per entity.
    fn add_nodes(&mut self) {
        for entity in self.entities.iter() {
            self.diagram
                .add_node(DiagramNode::new(entity.name(), entity.category()));
        }
    }

    /// Resolves imports, declarations and injections into edges.
    fn resolve_edges(&mut self) {
        let entities = self.entities;
        for module in &entities.modules {
            for import in &module.imports {
                self.link_or_fabricate(&module.name, import, EdgeKind::Imports, NodeCategory::ExternalModule);
            }

            for declaration in &module.declarations {
                let declares_component = self
                    .diagram
                    .node(declaration)
                    .is_some_and(|n| n.category == NodeCategory::Component);
                if declares_component {
                    self.diagram
                        .add_edge(DiagramEdge::new(&module.name, declaration, EdgeKind::Declares));
                } else {
                    debug!("Dropping unresolved declaration {} in {}", declaration, module.name);
                }
            }
        }

        for component in &entities.components {
            for dependency in &component.injected_dependencies {
                self.link_or_fabricate(
                    &component.name,
                    dependency,
                    EdgeKind::Injects,
                    NodeCategory::ExternalInjectable,
                );
            }
        }
    }

    /// Adds `from -> to`, creating `to` with `fallback` category if it is unknown.
    fn link_or_fabricate(&mut self, from: &str, to: &str, kind: EdgeKind, fallback: NodeCategory) {
        if self.diagram.add_node(DiagramNode::new(to, fallback)) {
            debug!("Fabricated {} node {}", fallback, to);
        }
        self.diagram.add_edge(DiagramEdge::new(from, to, kind));
    }

    /// Validates and builds the diagram without assigning levels.
    pub fn build(mut self) -> Result<Diagram> {
        self.validate()?;
        self.add_nodes();
        self.resolve_edges();

        debug!(
            "Built diagram with {} nodes, {} edges",
            self.diagram.node_count(),
            self.diagram.edge_count()
        );
        Ok(self.diagram)
    }
}

/// Builds nodes and edges for the given entities. Levels are all zero.
pub fn build_graph(entities: &ProjectEntities) -> Result<Diagram> {
    GraphBuilder::new(entities).build()
}

/// Builds the diagram and assigns every node its layer.
pub fn build_diagram(entities: &ProjectEntities) -> Result<Diagram> {
    let mut diagram = build_graph(entities)?;
    assign_levels(&mut diagram)?;
    Ok(diagram)
}
