use std::path::Path;

use defmap_item_tree::{CrateGraphError, Edition};
use serde::{Deserialize, Serialize};

/// Knobs for building definition maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Edition for crates that do not declare one.
    pub edition: Edition,
    /// Maximum depth of glob-import propagation chains.
    pub glob_recursion_limit: usize,
    /// Module whose public names are in scope everywhere, e.g.
    /// `std::prelude::v1`. Its first segment must name a dependency.
    pub prelude: Option<String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        ResolveConfig { edition: Edition::default(), glob_recursion_limit: 100, prelude: None }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    config: ResolveConfig,
}

impl ResolveConfig {
    /// Reads the `[config]` table of a crate graph file; a missing table
    /// yields the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, CrateGraphError> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.config)
    }

    pub fn from_path(path: &Path) -> Result<Self, CrateGraphError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| CrateGraphError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }
}
