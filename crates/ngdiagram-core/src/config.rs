//! Project configuration read from `ngdiagram.toml`

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::{EdgePolicy, FilterOptions};
use crate::model::NodeCategory;
use crate::options::{LayoutSpacing, RenderOptions, Theme};

/// Config file looked up in the project root.
pub const CONFIG_FILE: &str = "ngdiagram.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Categories hidden unless a request says otherwise.
    pub exclude: BTreeSet<NodeCategory>,
    pub drop_dangling_edges: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub theme: Theme,
    pub layout: LayoutSpacing,
    pub filter: FilterConfig,
}

impl DiagramConfig {
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load `ngdiagram.toml` from `root`, or defaults if there is none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::config_path(root);
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(DiagramConfig::default());
        }

        let text = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::for_theme(self.theme, self.layout)
    }

    /// Filter applied when a caller does not name categories itself.
    pub fn default_filter(&self) -> FilterOptions {
        FilterOptions {
            exclude: self.filter.exclude.clone(),
            edges: self.edge_policy(),
        }
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        if self.filter.drop_dangling_edges {
            EdgePolicy::DropDangling
        } else {
            EdgePolicy::Passthrough
        }
    }
}
