//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ngdiagram_core::{
    DiagramConfig, DiagramSession, EdgePolicy, FilterOptions, NodeCategory, ProjectEntities, Theme,
};
use ngdiagram_server::{NgDiagramServer, ServerConfig};

/// Read an entities JSON file.
pub fn load_entities(path: &Path) -> anyhow::Result<ProjectEntities> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read entities from {}", path.display()))?;
    let entities = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid entities file", path.display()))?;
    Ok(entities)
}

/// Project root plus its config, with CLI overrides applied.
pub struct Project {
    pub root: PathBuf,
    pub config: DiagramConfig,
}

impl Project {
    pub fn load(root: PathBuf, theme: Option<Theme>) -> anyhow::Result<Self> {
        let mut config = DiagramConfig::load(&root)
            .with_context(|| format!("failed to load config from {}", root.display()))?;
        if let Some(theme) = theme {
            config.theme = theme;
        }
        Ok(Project { root, config })
    }

    pub fn session(&self) -> DiagramSession {
        DiagramSession::from_config(&self.config)
    }

    /// Session with the entities in `input` already analyzed.
    pub fn analyze(&self, input: &Path) -> anyhow::Result<DiagramSession> {
        let mut session = self.session();
        let snapshot = session.analyze(load_entities(input)?)?;

        tracing::info!(
            "Analyzed {} nodes, {} edges across {} levels",
            snapshot.diagram.node_count(),
            snapshot.diagram.edge_count(),
            snapshot.diagram.max_level() + 1
        );
        Ok(session)
    }
}

pub fn build(project: &Project, input: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let session = project.analyze(input)?;
    let payload = session.payload()?;

    ngdiagram_core::save_payload(&payload, &project.root)?;

    let json = serde_json::to_string_pretty(&payload)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote diagram to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn filter(
    project: &Project,
    input: &Path,
    exclude: Vec<NodeCategory>,
    drop_dangling: bool,
) -> anyhow::Result<()> {
    let session = project.analyze(input)?;

    let mut options = if exclude.is_empty() {
        session.default_filter().clone()
    } else {
        FilterOptions::excluding(exclude).with_edge_policy(session.default_filter().edges)
    };
    if drop_dangling {
        options.edges = EdgePolicy::DropDangling;
    }

    println!("{}", serde_json::to_string_pretty(&session.filter(&options)?)?);
    Ok(())
}

pub fn metadata(project: &Project, input: &Path, node_id: &str) -> anyhow::Result<()> {
    let session = project.analyze(input)?;
    println!("{}", serde_json::to_string_pretty(&session.metadata(node_id)?)?);
    Ok(())
}

pub async fn serve(
    project: Project,
    input: Option<PathBuf>,
    host: String,
    port: u16,
    open: bool,
) -> anyhow::Result<()> {
    let session = match input {
        Some(input) => project.analyze(&input)?,
        None => {
            tracing::info!("No entities given; waiting for POST /api/analyze");
            project.session()
        }
    };

    let server = NgDiagramServer::new(session, ServerConfig { host, port });
    let url = format!("http://{}", server.address()?);

    if open {
        if let Err(e) = open::that(&url) {
            tracing::warn!("Could not open browser at {}: {}", url, e);
        }
    }

    server.start().await
}

pub fn clear(project: &Project) -> anyhow::Result<()> {
    tracing::info!("Clearing cache for: {}", project.root.display());
    ngdiagram_core::clear_cache(&project.root)?;
    tracing::info!("Cache cleared");
    Ok(())
}
