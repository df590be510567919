//! Config file loaders. Specs resolve paths under the workspace `data/`
//! directory and fall back to embedded defaults when a file is absent.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefer the top-level workspace `data/` so tests and tools can run from any
/// crate directory.
pub fn data_root() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() {
        ws
    } else {
        here.join("data")
    }
}

/// Read a raw config file under `data/` and return its contents.
pub fn read_config(rel: impl AsRef<Path>) -> Result<String> {
    let path = data_root().join(rel);
    let s = fs::read_to_string(&path).with_context(|| format!("read config: {}", path.display()))?;
    Ok(s)
}

/// Deserialize a TOML config under `data/`, or `None` when the file does not
/// exist (callers fall back to embedded defaults).
pub fn load_toml_opt<T: serde::de::DeserializeOwned>(rel: impl AsRef<Path>) -> Result<Option<T>> {
    let path = data_root().join(&rel);
    if !path.is_file() {
        return Ok(None);
    }
    let txt = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let v = toml::from_str(&txt).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(v))
}
