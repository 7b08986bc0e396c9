//! Core of ngdiagram: entity model, graph builder, layering, filtering and metadata projection

pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod graph;
pub mod layout;
pub mod metadata;
pub mod model;
pub mod options;
pub mod session;


#[cfg(test)]
pub mod test_utils;

pub use builder::{GraphBuilder, build_diagram, build_graph};
pub use cache::{CACHE_DIR, DIAGRAM_CACHE, cache_dir, clear_cache, diagram_cache_path, load_payload, save_payload};
pub use config::{CONFIG_FILE, DiagramConfig, FilterConfig};
pub use error::{DiagramError, InvalidEntityModel, Result};
pub use filter::{EdgePolicy, FilterOptions, FilteredGraph, filter_graph};
pub use graph::{Diagram, DiagramEdge, DiagramNode, EdgeKind, edge_id};
pub use layout::{assign_levels, compute_levels, layers, roots};
pub use metadata::{EntityMetadata, MetadataView, project_metadata};
pub use model::{
    ChangeDetection, ComponentEntity, Entity, EntityRef, InjectableEntity, ModuleEntity, NodeCategory,
    ProjectEntities,
};
pub use options::{DiagramPayload, LayoutSpacing, RenderOptions, Theme, UnknownTheme};
pub use session::{AnalysisTicket, DiagramSession, Snapshot};
