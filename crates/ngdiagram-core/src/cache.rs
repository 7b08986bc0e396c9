//! Cache for built diagram payloads

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::DiagramPayload;

/// Cache directory: .ngdiagram/
pub const CACHE_DIR: &str = ".ngdiagram";

/// Diagram cache file
pub const DIAGRAM_CACHE: &str = "diagram.json";

#[derive(Debug, Serialize, Deserialize)]
struct CachedDiagram {
    version: String,
    cached_at: String,
    payload: DiagramPayload,
}

/// Get cache directory path
pub fn cache_dir(root: &Path) -> PathBuf {
    root.join(CACHE_DIR)
}

/// Get diagram cache file path
pub fn diagram_cache_path(root: &Path) -> PathBuf {
    root.join(CACHE_DIR).join(DIAGRAM_CACHE)
}

/// Ensure cache directory exists
pub fn ensure_cache_dir(root: &Path) -> std::io::Result<()> {
    let cache = cache_dir(root);
    if !cache.exists() {
        std::fs::create_dir_all(&cache)?;
    }
    Ok(())
}

/// Write the payload of the latest build to the cache.
pub fn save_payload(payload: &DiagramPayload, root: &Path) -> Result<()> {
    ensure_cache_dir(root)?;
    let path = diagram_cache_path(root);

    let cached = CachedDiagram {
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached_at: chrono::Utc::now().to_rfc3339(),
        payload: payload.clone(),
    };
    std::fs::write(&path, serde_json::to_string_pretty(&cached)?)?;

    tracing::debug!("Diagram cache saved: {}", path.display());
    Ok(())
}

/// Load the cached payload. Caches written by another version are ignored.
pub fn load_payload(root: &Path) -> Result<Option<DiagramPayload>> {
    let path = diagram_cache_path(root);
    if !path.exists() {
        return Ok(None);
    }

    let json_str = std::fs::read_to_string(&path)?;
    let cached: CachedDiagram = serde_json::from_str(&json_str)?;
    if cached.version != env!("CARGO_PKG_VERSION") {
        tracing::debug!("Ignoring diagram cache from v{}", cached.version);
        return Ok(None);
    }

    tracing::debug!("Diagram cache loaded from: {}", path.display());
    Ok(Some(cached.payload))
}

/// Clear cache directory
pub fn clear_cache(root: &Path) -> std::io::Result<()> {
    let cache = cache_dir(root);
    if cache.exists() {
        std::fs::remove_dir_all(&cache)?;
    }
    Ok(())
}
