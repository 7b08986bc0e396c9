//! Entity model for the project diagram

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Discriminates what a diagram node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeCategory {
    // ── Declared in the analyzed project ────────────────────
    Module,
    Component,
    Injectable,

    // ── Fabricated for dangling references ──────────────────
    ExternalModule,
    ExternalInjectable,
}

impl NodeCategory {
    pub const ALL: [NodeCategory; 5] = [
        NodeCategory::Module,
        NodeCategory::ExternalModule,
        NodeCategory::Component,
        NodeCategory::Injectable,
        NodeCategory::ExternalInjectable,
    ];

    /// True for categories that only exist as resolved references.
    pub fn is_external(self) -> bool {
        matches!(self, NodeCategory::ExternalModule | NodeCategory::ExternalInjectable)
    }

    /// UI surface that displays metadata for nodes of this category.
    pub fn container_id(self) -> &'static str {
        match self {
            NodeCategory::Module | NodeCategory::ExternalModule => "module-metadata",
            NodeCategory::Component => "component-metadata",
            NodeCategory::Injectable | NodeCategory::ExternalInjectable => "injectable-metadata",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Module => "module",
            NodeCategory::ExternalModule => "externalModule",
            NodeCategory::Component => "component",
            NodeCategory::Injectable => "injectable",
            NodeCategory::ExternalInjectable => "externalInjectable",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`NodeCategory`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for NodeCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Change-detection strategy declared on a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChangeDetection {
    #[default]
    Default,
    OnPush,
}

impl fmt::Display for ChangeDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeDetection::Default => f.write_str("Default"),
            ChangeDetection::OnPush => f.write_str("OnPush"),
        }
    }
}

fn default_internal() -> bool {
    true
}

/// A module: imports other modules, declares components, provides services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntity {
    pub name: String,
    /// Empty for modules resolved only as a reference.
    #[serde(default)]
    pub path: PathBuf,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<String>,
    #[serde(default)]
    pub providers: Vec<String>,
    /// False when the module is only known as a reference.
    #[serde(default = "default_internal")]
    pub internal: bool,
}

impl ModuleEntity {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            imports: Vec::new(),
            declarations: Vec::new(),
            providers: Vec::new(),
            internal: true,
        }
    }

    pub fn with_imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports = imports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_declarations<I, S>(mut self, declarations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declarations = declarations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_providers<I, S>(mut self, providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providers = providers.into_iter().map(Into::into).collect();
        self
    }

    pub fn external(mut self) -> Self {
        self.internal = false;
        self
    }
}

/// A component: a selector-bound view class with injected dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntity {
    pub name: String,
    pub path: PathBuf,
    /// Empty when the component declares no selector.
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub change_detection: ChangeDetection,
    #[serde(default)]
    pub injected_dependencies: Vec<String>,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl ComponentEntity {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            selector: String::new(),
            change_detection: ChangeDetection::Default,
            injected_dependencies: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = selector.into();
        self
    }

    pub fn with_change_detection(mut self, mode: ChangeDetection) -> Self {
        self.change_detection = mode;
        self
    }

    pub fn with_injected<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.injected_dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }
}

/// An injectable service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectableEntity {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub provided_in: Option<String>,
}

impl InjectableEntity {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            provided_in: None,
        }
    }

    pub fn provided_in(mut self, scope: impl Into<String>) -> Self {
        self.provided_in = Some(scope.into());
        self
    }
}

/// Shape shared by every entity kind.
pub trait Entity {
    fn name(&self) -> &str;
    fn path(&self) -> &Path;
    fn category(&self) -> NodeCategory;
}

impl Entity for ModuleEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn category(&self) -> NodeCategory {
        if self.internal {
            NodeCategory::Module
        } else {
            NodeCategory::ExternalModule
        }
    }
}

impl Entity for ComponentEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Component
    }
}

impl Entity for InjectableEntity {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn category(&self) -> NodeCategory {
        NodeCategory::Injectable
    }
}

/// Borrowed view of any one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef<'a> {
    Module(&'a ModuleEntity),
    Component(&'a ComponentEntity),
    Injectable(&'a InjectableEntity),
}

impl<'a> EntityRef<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            EntityRef::Module(m) => m.name(),
            EntityRef::Component(c) => c.name(),
            EntityRef::Injectable(i) => i.name(),
        }
    }

    pub fn category(&self) -> NodeCategory {
        match *self {
            EntityRef::Module(m) => m.category(),
            EntityRef::Component(c) => c.category(),
            EntityRef::Injectable(i) => i.category(),
        }
    }
}

/// Everything one analysis pass produces, delivered as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntities {
    #[serde(default)]
    pub modules: Vec<ModuleEntity>,
    #[serde(default)]
    pub components: Vec<ComponentEntity>,
    #[serde(default)]
    pub injectables: Vec<InjectableEntity>,
}

impl ProjectEntities {
    pub fn new(
        modules: Vec<ModuleEntity>,
        components: Vec<ComponentEntity>,
        injectables: Vec<InjectableEntity>,
    ) -> Self {
        Self {
            modules,
            components,
            injectables,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.components.is_empty() && self.injectables.is_empty()
    }

    /// All entities in build order: modules, then components, then injectables.
    pub fn iter(&self) -> impl Iterator<Item = EntityRef<'_>> {
        self.modules
            .iter()
            .map(EntityRef::Module)
            .chain(self.components.iter().map(EntityRef::Component))
            .chain(self.injectables.iter().map(EntityRef::Injectable))
    }

    /// Find the entity declared under `name`, searching every kind.
    pub fn find(&self, name: &str) -> Option<EntityRef<'_>> {
        self.iter().find(|entity| entity.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in NodeCategory::ALL {
            assert_eq!(category.as_str().parse::<NodeCategory>(), Ok(category));
        }
        assert!("directive".parse::<NodeCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_camel_case() {
        let json = serde_json::to_string(&NodeCategory::ExternalInjectable).unwrap();
        assert_eq!(json, "\"externalInjectable\"");
    }

    #[test]
    fn test_external_modules_map_to_external_category() {
        let module = ModuleEntity::new("CommonModule", "").external();
        assert_eq!(module.category(), NodeCategory::ExternalModule);
        assert!(module.category().is_external());
    }

    #[test]
    fn test_entities_deserialize_with_defaults() {
        let json = r#"{
            "modules": [{ "name": "AppModule", "path": "src/app/app.module.ts" }],
            "components": [{ "name": "AppComponent", "path": "src/app/app.component.ts",
                             "changeDetection": "OnPush", "injectedDependencies": ["Logger"] }],
            "injectables": [{ "name": "Logger", "path": "src/app/logger.ts", "providedIn": "root" }]
        }"#;
        let entities: ProjectEntities = serde_json::from_str(json).unwrap();

        assert!(entities.modules[0].internal);
        assert!(entities.modules[0].imports.is_empty());
        assert_eq!(entities.components[0].change_detection, ChangeDetection::OnPush);
        assert_eq!(entities.components[0].selector, "");
        assert_eq!(entities.injectables[0].provided_in.as_deref(), Some("root"));
    }

    #[test]
    fn test_iter_orders_modules_components_injectables() {
        let entities = ProjectEntities::new(
            vec![ModuleEntity::new("M", "m.ts")],
            vec![ComponentEntity::new("C", "c.ts")],
            vec![InjectableEntity::new("I", "i.ts")],
        );
        let names: Vec<_> = entities.iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, ["M", "C", "I"]);
        assert_eq!(entities.find("C").map(|e| e.category()), Some(NodeCategory::Component));
    }
}
