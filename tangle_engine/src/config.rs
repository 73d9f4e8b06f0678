//! Engine configuration loaded from TOML.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command-line flags are applied on top by the binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::data_paths::data_path;

pub const CONFIG_FILE: &str = "tangle.toml";
pub const DEFAULT_WRAP_WIDTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Story document to play.
    pub story: PathBuf,
    /// Passage to start at instead of the story's own start.
    pub start: Option<String>,
    /// Column at which displayed text is wrapped.
    pub wrap_width: usize,
    /// Persist read-loop history between sessions.
    pub history: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            story: data_path("story.json"),
            start: None,
            wrap_width: DEFAULT_WRAP_WIDTH,
            history: true,
        }
    }
}

/// Load configuration from `path`, or from the data directory's `tangle.toml`.
///
/// # Errors
/// A missing file yields defaults; a file that exists but cannot be parsed is an error.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let path = path.map_or_else(|| data_path(CONFIG_FILE), Path::to_path_buf);
    match fs::read_to_string(&path) {
        Ok(content) => {
            let config: EngineConfig =
                toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))?;
            info!("configuration loaded from '{}'", path.display());
            Ok(config)
        },
        Err(e) => {
            warn!("could not read config '{}': {e}. Using defaults.", path.display());
            Ok(EngineConfig::default())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/tangle.toml"))).unwrap();
        assert_eq!(config.wrap_width, DEFAULT_WRAP_WIDTH);
        assert!(config.history);
        assert!(config.start.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: EngineConfig = toml::from_str("start = \"outside\"\nwrap_width = 72").unwrap();
        assert_eq!(config.start.as_deref(), Some("outside"));
        assert_eq!(config.wrap_width, 72);
        assert!(config.history);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "wrap_width = \"wide\"").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
