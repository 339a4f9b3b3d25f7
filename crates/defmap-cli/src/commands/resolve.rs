use std::path::Path;

use defmap_item_tree::Edition;
use defmap_nameres::{Namespace, Path as ImportPath, ResolveMode};

use super::{load_database, unknown_crate};
use crate::error::CliError;

pub fn handle_resolve(
    path: &Path,
    krate: &str,
    module: &str,
    text: &str,
    import: bool,
    edition: Option<Edition>,
) -> Result<(), CliError> {
    let db = load_database(path, edition)?;
    let def_map = db.crate_def_map_by_name(krate).ok_or_else(|| unknown_crate(&db, krate))?;
    let module_id = def_map
        .module_by_text(module)
        .ok_or_else(|| CliError::UnknownModule { krate: krate.to_string(), module: module.to_string() })?;
    let parsed = ImportPath::parse(text).ok_or_else(|| CliError::InvalidPath(text.to_string()))?;

    let mode = if import { ResolveMode::Import } else { ResolveMode::Other };
    let result = def_map.resolve_path(module_id, &parsed, mode);

    for ns in Namespace::ALL {
        match result.resolved_def.get(ns) {
            Some(item) => {
                let visibility = if item.visibility.is_public() { "pub" } else { "restricted" };
                println!("{ns}: {} ({visibility})", def_map.display_path(&item.path));
            }
            None => println!("{ns}: -"),
        }
    }
    if result.resolved_def.is_empty() {
        log::warn!("`{text}` does not resolve from `{module}` in `{krate}`");
    }
    Ok(())
}
