//! Error types for diagram construction

use thiserror::Error;

use crate::model::NodeCategory;

/// Why a set of entities cannot be turned into a diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidEntityModel {
    #[error("name `{name}` is declared as both {first} and {second}")]
    DuplicateName {
        name: String,
        first: NodeCategory,
        second: NodeCategory,
    },

    #[error("{category} `{name}` references itself through `{field}`")]
    SelfReference {
        name: String,
        category: NodeCategory,
        field: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("invalid entity model: {0}")]
    InvalidEntityModel(#[from] InvalidEntityModel),

    #[error("cyclic dependency detected at node `{node}`")]
    CyclicDependencyDetected { node: String },

    #[error("no diagram has been built yet")]
    GraphNotBuilt,

    #[error("no node with id `{0}`")]
    UnknownNode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DiagramError>;
