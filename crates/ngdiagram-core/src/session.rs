//! Analysis session: owns the current diagram between builds.
//!
//! A session replaces the built diagram as a whole. Entities, nodes, edges
//! and levels from one analysis pass live in a single [`Snapshot`] behind an
//! `Arc`, so a reader never sees parts of two different builds.
//!
//! Re-analysis is ticketed. Each [`DiagramSession::begin_analysis`] call
//! supersedes every earlier ticket, and a snapshot built for a superseded
//! ticket is discarded on install rather than merged.

use std::sync::Arc;

use tracing::{info, warn};

use crate::builder::build_diagram;
use crate::config::DiagramConfig;
use crate::error::{DiagramError, Result};
use crate::filter::{FilterOptions, filter_graph};
use crate::graph::Diagram;
use crate::metadata::{MetadataView, project_metadata, project_reference};
use crate::model::ProjectEntities;
use crate::options::{DiagramPayload, RenderOptions};

/// Identifies one requested analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnalysisTicket(u64);

impl AnalysisTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Entities from one analysis pass and the diagram built from them.
#[derive(Debug)]
pub struct Snapshot {
    pub generation: u64,
    pub entities: ProjectEntities,
    pub diagram: Diagram,
}

impl Snapshot {
    /// Build a snapshot for `ticket`. Pure; safe to run outside any lock.
    pub fn build(ticket: AnalysisTicket, entities: ProjectEntities) -> Result<Self> {
        let diagram = build_diagram(&entities)?;
        Ok(Snapshot {
            generation: ticket.generation(),
            entities,
            diagram,
        })
    }

    /// Display record for the node with the given id.
    pub fn metadata(&self, node_id: &str) -> Result<MetadataView> {
        let node = self
            .diagram
            .node(node_id)
            .ok_or_else(|| DiagramError::UnknownNode(node_id.to_string()))?;

        let metadata = match self.entities.find(node_id) {
            Some(entity) => project_metadata(entity),
            None => project_reference(node_id, node.category)
                .ok_or_else(|| DiagramError::UnknownNode(node_id.to_string()))?,
        };

        Ok(MetadataView::new(node.category, metadata))
    }
}

pub struct DiagramSession {
    current: Option<Arc<Snapshot>>,
    options: RenderOptions,
    default_filter: FilterOptions,
    latest: u64,
}

impl std::fmt::Debug for DiagramSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagramSession")
            .field("generation", &self.current.as_ref().map(|s| s.generation))
            .field("latest", &self.latest)
            .finish()
    }
}

impl Default for DiagramSession {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl DiagramSession {
    pub fn new(options: RenderOptions) -> Self {
        DiagramSession {
            current: None,
            options,
            default_filter: FilterOptions::default(),
            latest: 0,
        }
    }

    pub fn from_config(config: &DiagramConfig) -> Self {
        DiagramSession {
            default_filter: config.default_filter(),
            ..Self::new(config.render_options())
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn default_filter(&self) -> &FilterOptions {
        &self.default_filter
    }

    /// Start a new analysis pass, superseding any pass still in flight.
    pub fn begin_analysis(&mut self) -> AnalysisTicket {
        self.latest += 1;
        AnalysisTicket(self.latest)
    }

    /// Whether `ticket` is the most recently requested pass.
    pub fn is_current(&self, ticket: AnalysisTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Replace the current snapshot, unless a newer pass has been requested
    /// since this one began. Returns the installed snapshot.
    pub fn install(&mut self, snapshot: Snapshot) -> Option<Arc<Snapshot>> {
        if snapshot.generation != self.latest {
            warn!(
                "Discarding stale analysis {} (latest is {})",
                snapshot.generation, self.latest
            );
            return None;
        }

        info!(
            "Installed diagram {} with {} nodes, {} edges",
            snapshot.generation,
            snapshot.diagram.node_count(),
            snapshot.diagram.edge_count()
        );
        let snapshot = Arc::new(snapshot);
        self.current = Some(Arc::clone(&snapshot));
        Some(snapshot)
    }

    /// Build for `ticket` and install the result if it is still current.
    ///
    /// A failed build leaves the previous snapshot in place.
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        entities: ProjectEntities,
    ) -> Result<Option<Arc<Snapshot>>> {
        let snapshot = Snapshot::build(ticket, entities)?;
        Ok(self.install(snapshot))
    }

    /// Run a whole analysis pass synchronously.
    pub fn analyze(&mut self, entities: ProjectEntities) -> Result<Arc<Snapshot>> {
        let ticket = self.begin_analysis();
        let snapshot = Snapshot::build(ticket, entities)?;
        self.install(snapshot).ok_or(DiagramError::GraphNotBuilt)
    }

    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.current.clone().ok_or(DiagramError::GraphNotBuilt)
    }

    pub fn is_built(&self) -> bool {
        self.current.is_some()
    }

    /// The full diagram with renderer options.
    pub fn payload(&self) -> Result<DiagramPayload> {
        let snapshot = self.current.as_ref().ok_or(DiagramError::GraphNotBuilt)?;
        Ok(DiagramPayload::from_diagram(&snapshot.diagram, &self.options))
    }

    /// A filtered view of the current diagram. The diagram itself is untouched.
    pub fn filter(&self, options: &FilterOptions) -> Result<DiagramPayload> {
        let snapshot = self.current.as_ref().ok_or(DiagramError::GraphNotBuilt)?;
        let filtered = filter_graph(&snapshot.diagram, options);
        Ok(DiagramPayload::from_filtered(filtered, &self.options))
    }

    pub fn metadata(&self, node_id: &str) -> Result<MetadataView> {
        self.current
            .as_ref()
            .ok_or(DiagramError::GraphNotBuilt)?
            .metadata(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::EntityMetadata;
    use crate::model::{ComponentEntity, ModuleEntity, NodeCategory};

    fn entities() -> ProjectEntities {
        ProjectEntities::new(
            vec![
                ModuleEntity::new("AppModule", "app.module.ts")
                    .with_imports(["CommonModule"])
                    .with_declarations(["AppComponent"]),
            ],
            vec![ComponentEntity::new("AppComponent", "app.component.ts").with_injected(["Logger"])],
            vec![],
        )
    }

    #[test]
    fn test_reads_before_build_fail() {
        let session = DiagramSession::default();
        assert!(matches!(session.payload(), Err(DiagramError::GraphNotBuilt)));
        assert!(matches!(
            session.filter(&FilterOptions::default()),
            Err(DiagramError::GraphNotBuilt)
        ));
        assert!(matches!(session.metadata("AppModule"), Err(DiagramError::GraphNotBuilt)));
    }

    #[test]
    fn test_analyze_installs_snapshot() {
        let mut session = DiagramSession::default();
        let snapshot = session.analyze(entities()).unwrap();

        assert_eq!(snapshot.generation, 1);
        assert_eq!(session.payload().unwrap().nodes.len(), 4);
        assert_eq!(session.payload().unwrap().options, *session.options());
    }

    #[test]
    fn test_stale_analysis_is_discarded() {
        let mut session = DiagramSession::default();
        let first = session.begin_analysis();
        let second = session.begin_analysis();
        assert!(!session.is_current(first));

        let installed = session.complete_analysis(first, entities()).unwrap();
        assert!(installed.is_none());
        assert!(!session.is_built());

        let installed = session.complete_analysis(second, ProjectEntities::default()).unwrap();
        assert_eq!(installed.unwrap().generation, second.generation());
        assert!(session.payload().unwrap().nodes.is_empty());
    }

    #[test]
    fn test_failed_analysis_keeps_previous_snapshot() {
        let mut session = DiagramSession::default();
        session.analyze(entities()).unwrap();

        let broken = ProjectEntities::new(
            vec![ModuleEntity::new("Loop", "loop.module.ts").with_imports(["Loop"])],
            vec![],
            vec![],
        );
        assert!(session.analyze(broken).is_err());
        assert_eq!(session.payload().unwrap().nodes.len(), 4);
    }

    #[test]
    fn test_metadata_for_entities_and_fabricated_nodes() {
        let mut session = DiagramSession::default();
        session.analyze(entities()).unwrap();

        let view = session.metadata("AppComponent").unwrap();
        assert_eq!(view.container_id, "component-metadata");
        assert!(matches!(view.metadata, EntityMetadata::Component(_)));

        let view = session.metadata("CommonModule").unwrap();
        assert_eq!(view.container_id, NodeCategory::ExternalModule.container_id());
        assert!(matches!(view.metadata, EntityMetadata::Module(_)));

        let view = session.metadata("Logger").unwrap();
        assert!(matches!(view.metadata, EntityMetadata::Injectable(_)));

        assert!(matches!(session.metadata("Nope"), Err(DiagramError::UnknownNode(_))));
    }

    #[test]
    fn test_from_config_uses_default_filter() {
        let config = DiagramConfig::from_toml("[filter]\nexclude = [\"component\"]\n").unwrap();
        let mut session = DiagramSession::from_config(&config);
        session.analyze(entities()).unwrap();

        let payload = session.filter(session.default_filter()).unwrap();
        assert!(payload.nodes.iter().all(|n| n.category != NodeCategory::Component));
    }
}
