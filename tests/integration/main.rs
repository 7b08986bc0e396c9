//! Integration tests for ngdiagram
//!
//! These drive the CLI binary and the server state end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use ngdiagram_core::{DiagramConfig, DiagramSession, NodeCategory, ProjectEntities};
use ngdiagram_server::{PanelMessage, ServerState};
use serde_json::Value;
use tempfile::TempDir;

const ENTITIES: &str = r#"{
  "modules": [
    {
      "name": "AppModule",
      "path": "src/app/app.module.ts",
      "imports": ["CommonModule", "FeatureModule"],
      "declarations": ["AppComponent"],
      "providers": ["AuthService"]
    },
    {
      "name": "FeatureModule",
      "path": "src/app/feature/feature.module.ts",
      "declarations": ["FeatureComponent"]
    }
  ],
  "components": [
    {
      "name": "AppComponent",
      "path": "src/app/app.component.ts",
      "selector": "app-root",
      "injectedDependencies": ["AuthService"]
    },
    {
      "name": "FeatureComponent",
      "path": "src/app/feature/feature.component.ts",
      "selector": "app-feature",
      "changeDetection": "OnPush",
      "injectedDependencies": ["HttpClient"],
      "inputs": ["title"]
    }
  ],
  "injectables": [
    { "name": "AuthService", "path": "src/app/auth.service.ts", "providedIn": "root" }
  ]
}"#;

fn project() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("entities.json");
    fs::write(&input, ENTITIES).unwrap();
    (dir, input)
}

fn ngdiagram(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ngdiagram"));
    cmd.arg("--root").arg(root);
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("Failed to execute ngdiagram");
    assert!(
        output.status.success(),
        "ngdiagram failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn entities() -> ProjectEntities {
    serde_json::from_str(ENTITIES).unwrap()
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_ngdiagram"))
        .arg("--help")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dependency diagrams"));
}

#[test]
fn test_build_writes_output_and_cache() {
    let (dir, input) = project();
    let out = dir.path().join("diagram.json");

    let status = ngdiagram(dir.path())
        .args(["build", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let payload: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let ids: Vec<&str> = payload["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        [
            "AppModule",
            "FeatureModule",
            "AppComponent",
            "FeatureComponent",
            "AuthService",
            "CommonModule",
            "HttpClient"
        ]
    );
    assert_eq!(payload["nodes"][5]["group"], "externalModule");
    assert_eq!(payload["nodes"][6]["group"], "externalInjectable");

    assert!(ngdiagram_core::load_payload(dir.path()).unwrap().is_some());
}

#[test]
fn test_theme_flag_overrides_config() {
    let (dir, input) = project();
    fs::write(dir.path().join(ngdiagram_core::CONFIG_FILE), "theme = \"light\"\n").unwrap();

    let payload = stdout_json(
        ngdiagram(dir.path())
            .args(["--theme", "dark", "build", "--input"])
            .arg(&input),
    );
    assert_eq!(payload["options"]["nodes"]["font"]["color"], "#FFFFFF");
}

#[test]
fn test_filter_command() {
    let (dir, input) = project();

    let payload = stdout_json(
        ngdiagram(dir.path())
            .args(["filter", "--input"])
            .arg(&input)
            .args(["--exclude", "externalModule", "--exclude", "externalInjectable"]),
    );
    assert_eq!(payload["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(payload["edges"].as_array().unwrap().len(), 6);

    let payload = stdout_json(
        ngdiagram(dir.path())
            .args(["filter", "--drop-dangling", "--input"])
            .arg(&input)
            .args(["--exclude", "externalModule", "--exclude", "externalInjectable"]),
    );
    assert_eq!(payload["edges"].as_array().unwrap().len(), 4);
}

#[test]
fn test_filter_uses_configured_default() {
    let (dir, input) = project();
    fs::write(
        dir.path().join(ngdiagram_core::CONFIG_FILE),
        "[filter]\nexclude = [\"component\"]\ndrop_dangling_edges = true\n",
    )
    .unwrap();

    let payload = stdout_json(ngdiagram(dir.path()).args(["filter", "--input"]).arg(&input));
    let groups: Vec<&str> = payload["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["group"].as_str().unwrap())
        .collect();
    assert!(!groups.contains(&"component"));
    assert_eq!(payload["edges"].as_array().unwrap().len(), 2);
}

#[test]
fn test_metadata_command() {
    let (dir, input) = project();

    let view = stdout_json(
        ngdiagram(dir.path())
            .args(["metadata", "--input"])
            .arg(&input)
            .arg("FeatureComponent"),
    );
    assert_eq!(view["containerId"], "component-metadata");
    assert_eq!(view["metadata"]["selector"], "app-feature");
    assert_eq!(view["metadata"]["inputs"], "title");
    assert_eq!(view["metadata"]["outputs"], "None");
}

#[test]
fn test_metadata_of_unknown_node_fails() {
    let (dir, input) = project();

    let output = ngdiagram(dir.path())
        .args(["metadata", "--input"])
        .arg(&input)
        .arg("Nope")
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_clear_removes_cache() {
    let (dir, input) = project();
    assert!(ngdiagram(dir.path()).args(["build", "--input"]).arg(&input).status().unwrap().success());
    assert!(ngdiagram_core::cache_dir(dir.path()).exists());

    assert!(ngdiagram(dir.path()).arg("clear").status().unwrap().success());
    assert!(ngdiagram_core::load_payload(dir.path()).unwrap().is_none());
}

#[tokio::test]
async fn test_server_state_with_config() {
    let config = DiagramConfig::from_toml("theme = \"dark\"\n").unwrap();
    let state = ServerState::new(DiagramSession::from_config(&config));
    let mut rx = state.display_tx.subscribe();

    let payload = state.analyze(entities()).await.unwrap().unwrap();
    assert_eq!(payload.options.as_value()["nodes"]["font"]["color"], "#FFFFFF");

    let text = rx.recv().await.unwrap();
    let raw: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["command"], "DISPLAY-DIAGRAM");

    match serde_json::from_str::<PanelMessage>(&text).unwrap() {
        PanelMessage::DisplayDiagram { data } => assert_eq!(data, payload),
        other => panic!("unexpected message: {:?}", other),
    }

    let session = state.session.read().await;
    assert_eq!(
        session.snapshot().unwrap().diagram.level("HttpClient"),
        Some(3)
    );
    assert_eq!(
        session.metadata("CommonModule").unwrap().container_id,
        NodeCategory::ExternalModule.container_id()
    );
}

#[tokio::test]
async fn test_failed_analysis_keeps_previous_diagram() {
    let state = ServerState::new(DiagramSession::default());
    state.analyze(entities()).await.unwrap();

    let mut broken = entities();
    broken.modules[1].imports.push("FeatureModule".to_string());
    assert!(state.analyze(broken).await.is_err());

    let payload = state.session.read().await.payload().unwrap();
    assert_eq!(payload.nodes.len(), 7);
}
