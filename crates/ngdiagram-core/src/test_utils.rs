//! Test fixtures for ngdiagram-core

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::model::{ChangeDetection, ComponentEntity, InjectableEntity, ModuleEntity, ProjectEntities};

/// One module importing an unknown module and declaring one component,
/// which injects an unknown service.
pub fn scenario_a() -> ProjectEntities {
    ProjectEntities::new(
        vec![
            ModuleEntity::new("AppModule", "src/app/app.module.ts")
                .with_imports(["CommonModule"])
                .with_declarations(["AppComponent"]),
        ],
        vec![
            ComponentEntity::new("AppComponent", "src/app/app.component.ts")
                .with_selector("app-root")
                .with_injected(["LoggerService"]),
        ],
        vec![],
    )
}

/// Two components injecting the same unknown service.
pub fn scenario_c() -> ProjectEntities {
    ProjectEntities::new(
        vec![],
        vec![
            ComponentEntity::new("X", "src/app/x.component.ts").with_injected(["SharedSvc"]),
            ComponentEntity::new("Y", "src/app/y.component.ts").with_injected(["SharedSvc"]),
        ],
        vec![],
    )
}

/// A small but complete application: feature module, shared module,
/// declared services, and a mix of known and unknown injections.
pub fn hero_app() -> ProjectEntities {
    ProjectEntities::new(
        vec![
            ModuleEntity::new("AppModule", "src/app/app.module.ts")
                .with_imports(["BrowserModule", "HeroesModule", "SharedModule"])
                .with_declarations(["AppComponent"])
                .with_providers(["Logger"]),
            ModuleEntity::new("HeroesModule", "src/app/heroes/heroes.module.ts")
                .with_imports(["CommonModule", "SharedModule"])
                .with_declarations(["HeroListComponent", "HeroDetailComponent"]),
            ModuleEntity::new("SharedModule", "src/app/shared/shared.module.ts")
                .with_imports(["CommonModule"])
                .with_declarations(["SpinnerComponent", "UnknownPipe"]),
            ModuleEntity::new("BrowserModule", "").external(),
        ],
        vec![
            ComponentEntity::new("AppComponent", "src/app/app.component.ts")
                .with_selector("app-root")
                .with_injected(["Logger"]),
            ComponentEntity::new("HeroListComponent", "src/app/heroes/hero-list.component.ts")
                .with_selector("app-hero-list")
                .with_change_detection(ChangeDetection::OnPush)
                .with_injected(["HeroService", "Router"])
                .with_outputs(["selected"]),
            ComponentEntity::new("HeroDetailComponent", "src/app/heroes/hero-detail.component.ts")
                .with_selector("app-hero-detail")
                .with_injected(["HeroService", "ActivatedRoute"])
                .with_inputs(["hero"]),
            ComponentEntity::new("SpinnerComponent", "src/app/shared/spinner.component.ts"),
        ],
        vec![
            InjectableEntity::new("HeroService", "src/app/heroes/hero.service.ts").provided_in("root"),
            InjectableEntity::new("Logger", "src/app/logger.service.ts"),
        ],
    )
}

/// Write entities as JSON into a temp dir and return the dir and file path.
pub fn write_entities(entities: &ProjectEntities) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("entities.json");
    fs::write(&path, serde_json::to_string_pretty(entities).unwrap()).unwrap();
    (temp_dir, path)
}
