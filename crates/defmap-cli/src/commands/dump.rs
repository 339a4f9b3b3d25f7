use std::path::Path;

use defmap_item_tree::Edition;

use super::{load_database, unknown_crate};
use crate::error::CliError;

pub fn handle_dump(path: &Path, krate: Option<&str>, edition: Option<Edition>) -> Result<(), CliError> {
    let db = load_database(path, edition)?;

    let crates = match krate {
        Some(name) => vec![db.graph().crate_by_name(name).ok_or_else(|| unknown_crate(&db, name))?],
        None => db.graph().topological_order()?,
    };

    for id in crates {
        let Some(def_map) = db.crate_def_map(id) else { continue };
        println!("// {} (edition {})", def_map.crate_name(), def_map.edition());
        print!("{}", def_map.dump());
        for diagnostic in def_map.diagnostics() {
            eprintln!("{:?}", miette::Report::new(diagnostic.clone()));
        }
    }
    Ok(())
}
