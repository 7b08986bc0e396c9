//! REST API handlers for the diagram server

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use axum_extra::extract::Query;
use ngdiagram_core::{
    DiagramPayload, EdgePolicy, FilterOptions, MetadataView, NodeCategory, ProjectEntities,
};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ServerState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub built: bool,
}

/// Query string of the filtered diagram route. `exclude` may repeat.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    #[serde(default)]
    pub exclude: Vec<NodeCategory>,
    pub drop_dangling: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// False when a newer analysis overtook this one.
    pub installed: bool,
    pub node_count: usize,
    pub edge_count: usize,
    pub max_level: u32,
}

pub async fn health_check(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        built: state.session.read().await.is_built(),
    })
}

/// The full diagram of the last successful analysis.
pub async fn get_diagram(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<DiagramPayload>, ApiError> {
    Ok(Json(state.session.read().await.payload()?))
}

/// The diagram with some categories removed. Without any `exclude`
/// parameter the configured default filter applies.
pub async fn get_filtered_diagram(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<DiagramPayload>, ApiError> {
    let session = state.session.read().await;

    let mut options = if query.exclude.is_empty() {
        session.default_filter().clone()
    } else {
        FilterOptions::excluding(query.exclude).with_edge_policy(session.default_filter().edges)
    };
    if let Some(drop) = query.drop_dangling {
        options.edges = if drop {
            EdgePolicy::DropDangling
        } else {
            EdgePolicy::Passthrough
        };
    }

    Ok(Json(session.filter(&options)?))
}

pub async fn get_metadata(
    State(state): State<Arc<ServerState>>,
    Path(node_id): Path<String>,
) -> Result<Json<MetadataView>, ApiError> {
    Ok(Json(state.session.read().await.metadata(&node_id)?))
}

/// Re-analyze with the posted entities and push the result to panels.
pub async fn post_analyze(
    State(state): State<Arc<ServerState>>,
    Json(entities): Json<ProjectEntities>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let response = match state.analyze(entities).await? {
        Some(payload) => AnalyzeResponse {
            installed: true,
            node_count: payload.nodes.len(),
            edge_count: payload.edges.len(),
            max_level: payload.nodes.iter().map(|n| n.level).max().unwrap_or(0),
        },
        None => AnalyzeResponse {
            installed: false,
            node_count: 0,
            edge_count: 0,
            max_level: 0,
        },
    };
    Ok(Json(response))
}
