//! Display-ready metadata for a single entity

use serde::{Deserialize, Serialize};

use crate::model::{ComponentEntity, EntityRef, InjectableEntity, ModuleEntity, NodeCategory};

/// Joins list entries in every projected field.
pub const LIST_SEPARATOR: &str = ", ";

/// Shown for an empty list.
pub const NONE: &str = "None";

/// Shown where a field does not apply, e.g. imports of an external module.
pub const NOT_APPLICABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleType {
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMetadata {
    pub name: String,
    pub imports: String,
    pub declarations: String,
    pub providers: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub name: String,
    pub selector: String,
    pub change_detection: String,
    pub injected_dependencies: String,
    pub inputs: String,
    pub outputs: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectableMetadata {
    pub name: String,
    pub provided_in: String,
}

/// One display record, shaped by entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntityMetadata {
    Module(ModuleMetadata),
    Component(ComponentMetadata),
    Injectable(InjectableMetadata),
}

/// What the metadata display receives: the record and where to show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataView {
    pub container_id: String,
    pub metadata: EntityMetadata,
}

impl MetadataView {
    pub fn new(category: NodeCategory, metadata: EntityMetadata) -> Self {
        MetadataView {
            container_id: category.container_id().to_string(),
            metadata,
        }
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(LIST_SEPARATOR)
    }
}

pub fn project_module(module: &ModuleEntity) -> ModuleMetadata {
    if !module.internal {
        return external_module(&module.name);
    }
    ModuleMetadata {
        name: module.name.clone(),
        imports: join_or_none(&module.imports),
        declarations: join_or_none(&module.declarations),
        providers: join_or_none(&module.providers),
        module_type: ModuleType::Internal,
    }
}

fn external_module(name: &str) -> ModuleMetadata {
    ModuleMetadata {
        name: name.to_string(),
        imports: NOT_APPLICABLE.to_string(),
        declarations: NOT_APPLICABLE.to_string(),
        providers: NOT_APPLICABLE.to_string(),
        module_type: ModuleType::External,
    }
}

pub fn project_component(component: &ComponentEntity) -> ComponentMetadata {
    ComponentMetadata {
        name: component.name.clone(),
        selector: component.selector.clone(),
        change_detection: component.change_detection.to_string(),
        injected_dependencies: join_or_none(&component.injected_dependencies),
        inputs: join_or_none(&component.inputs),
        outputs: join_or_none(&component.outputs),
    }
}

pub fn project_injectable(injectable: &InjectableEntity) -> InjectableMetadata {
    InjectableMetadata {
        name: injectable.name.clone(),
        provided_in: injectable
            .provided_in
            .clone()
            .unwrap_or_else(|| NOT_APPLICABLE.to_string()),
    }
}

/// Format one entity's attributes for display.
pub fn project_metadata(entity: EntityRef<'_>) -> EntityMetadata {
    match entity {
        EntityRef::Module(m) => EntityMetadata::Module(project_module(m)),
        EntityRef::Component(c) => EntityMetadata::Component(project_component(c)),
        EntityRef::Injectable(i) => EntityMetadata::Injectable(project_injectable(i)),
    }
}

/// Metadata for a fabricated node that has no backing entity.
///
/// Only external categories can be fabricated, so declared categories yield `None`.
pub fn project_reference(name: &str, category: NodeCategory) -> Option<EntityMetadata> {
    match category {
        NodeCategory::ExternalModule => Some(EntityMetadata::Module(external_module(name))),
        NodeCategory::ExternalInjectable => Some(EntityMetadata::Injectable(InjectableMetadata {
            name: name.to_string(),
            provided_in: NOT_APPLICABLE.to_string(),
        })),
        NodeCategory::Module | NodeCategory::Component | NodeCategory::Injectable => None,
    }
}
