pub mod dump;
pub mod resolve;

use std::path::Path;

use defmap_item_tree::{CrateGraph, Edition};
use defmap_nameres::{DefDatabase, ResolveConfig};

use crate::error::CliError;

/// Loads a graph file together with its `[config]` table and resolves every
/// crate in it.
pub fn load_database(path: &Path, edition: Option<Edition>) -> Result<DefDatabase, CliError> {
    let graph = CrateGraph::from_path(path)?;
    let mut config = ResolveConfig::from_path(path)?;
    if let Some(edition) = edition {
        config.edition = edition;
    }
    log::info!("loaded {} crate(s) from {}", graph.len(), path.display());

    let mut db = DefDatabase::new(graph, config);
    db.build_all()?;
    Ok(db)
}

pub fn unknown_crate(db: &DefDatabase, name: &str) -> CliError {
    let known: Vec<&str> = db.graph().iter().map(|(_, data)| data.name.as_str()).collect();
    CliError::UnknownCrate { name: name.to_string(), known: known.join(", ") }
}
