//! Renderer options and the payload handed to the renderer

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::filter::FilteredGraph;
use crate::graph::{Diagram, DiagramEdge, DiagramNode};

/// Editor colour theme the diagram is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    HighContrast,
}

impl Theme {
    /// Label colour that contrasts with the theme background.
    pub fn font_colour(self) -> &'static str {
        match self {
            Theme::Light => "#000000",
            Theme::Dark | Theme::HighContrast => "#FFFFFF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}` (expected light, dark or high-contrast)")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "high-contrast" => Ok(Theme::HighContrast),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Spacing of the hierarchical layout, in renderer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpacing {
    pub level_separation: u32,
    pub node_spacing: u32,
    pub tree_spacing: u32,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        LayoutSpacing {
            level_separation: 200,
            node_spacing: 200,
            tree_spacing: 200,
        }
    }
}

/// Renderer configuration. Forwarded untouched alongside nodes and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderOptions(pub Value);

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions::for_theme(Theme::default(), LayoutSpacing::default())
    }
}

impl RenderOptions {
    /// Top-down network options with one icon style per node group.
    pub fn for_theme(theme: Theme, spacing: LayoutSpacing) -> Self {
        let module = json!({ "icon": { "code": "\u{f07b}", "color": "#0096FF" } });
        let component = json!({ "icon": { "code": "\u{f12e}", "color": "#40B5AD" } });
        let injectable = json!({ "icon": { "code": "\u{f362}", "color": "#5D3FD3" } });

        RenderOptions(json!({
            "nodes": {
                "borderWidth": 2,
                "font": { "color": theme.font_colour() },
                "shape": "icon",
                "icon": {
                    "face": "'Font Awesome 5 Free'",
                    "size": 50,
                    "weight": "900"
                }
            },
            "edges": {
                "length": 300,
                "smooth": false,
                "arrows": "to",
                "arrowStrikethrough": false
            },
            "physics": { "enabled": false },
            "layout": {
                "improvedLayout": true,
                "hierarchical": {
                    "sortMethod": "directed",
                    "levelSeparation": spacing.level_separation,
                    "nodeSpacing": spacing.node_spacing,
                    "treeSpacing": spacing.tree_spacing
                }
            },
            "interaction": {
                "hover": true,
                "navigationButtons": true,
                "keyboard": true
            },
            "groups": {
                "module": module.clone(),
                "externalModule": module,
                "component": component,
                "injectable": injectable.clone(),
                "externalInjectable": injectable
            }
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Everything the renderer needs for one build or filter call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramPayload {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
    pub options: RenderOptions,
}

impl DiagramPayload {
    pub fn from_diagram(diagram: &Diagram, options: &RenderOptions) -> Self {
        DiagramPayload {
            nodes: diagram.nodes().to_vec(),
            edges: diagram.edges().to_vec(),
            options: options.clone(),
        }
    }

    pub fn from_filtered(filtered: FilteredGraph, options: &RenderOptions) -> Self {
        DiagramPayload {
            nodes: filtered.nodes,
            edges: filtered.edges,
            options: options.clone(),
        }
    }
}
