//! Building definition maps crate by crate, and keeping the finished ones.

use std::sync::atomic::{AtomicBool, Ordering};

use defmap_item_tree::{normalize_crate_name, CrateGraph, CrateId};
use rustc_hash::FxHashMap;
use triomphe::Arc;

use crate::collector::DefCollector;
use crate::config::ResolveConfig;
use crate::def_map::{DefMap, ModuleId};
use crate::error::DefMapError;
use crate::path::{ModPath, Name, Path, PathKind};
use crate::tree_builder::build_module_tree;

/// A shared flag that asks running builds to stop. Clones observe the same
/// flag.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Clears the flag so that a cancelled build can be retried.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), DefMapError> {
        if self.is_cancelled() {
            Err(DefMapError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Builds the definition map of `krate`.
///
/// `dep_maps` must already hold a finished map for every crate `krate`
/// transitively depends on.
pub fn build_def_map(
    graph: &CrateGraph,
    krate: CrateId,
    dep_maps: &FxHashMap<CrateId, Arc<DefMap>>,
    config: &ResolveConfig,
    cancellation: &Cancellation,
) -> Result<DefMap, DefMapError> {
    let data = graph.crate_data(krate).ok_or(DefMapError::UnknownCrate(krate))?;
    cancellation.check()?;

    let mut deps = FxHashMap::default();
    for dep in graph.transitive_dependencies(krate)? {
        let Some(map) = dep_maps.get(&dep) else {
            let dependency = graph.crate_data(dep).map_or_else(|| dep.to_string(), |d| d.name.clone());
            return Err(DefMapError::DependencyNotBuilt { krate: data.name.clone(), dependency });
        };
        deps.insert(dep, map.clone());
    }

    let edition = data.edition.unwrap_or(config.edition);
    log::info!("resolving `{}` ({edition} edition, {} dependencies)", data.name, deps.len());

    let mut def_map = DefMap::empty(krate, data.name.clone(), edition, deps);
    for dep in graph.dependencies(krate)? {
        if let Some(dep_data) = graph.crate_data(dep) {
            def_map.extern_prelude.insert(Name::new(&dep_data.normalized_name()), ModuleId::crate_root(dep));
        }
    }

    let imports = build_module_tree(&mut def_map, &data.root);
    def_map.prelude = config.prelude.as_deref().and_then(|prelude| resolve_prelude(&def_map, prelude));

    let mut collector = DefCollector::new(def_map, imports, config.glob_recursion_limit, cancellation);
    let passes = collector.collect()?;
    log::debug!(
        "`{}` settled after {passes} pass(es) with {} resolved and {} unresolved import(s)",
        data.name,
        collector.resolved_imports().len(),
        collector.unresolved_imports().len()
    );
    let def_map = collector.finish();
    if !def_map.diagnostics().is_empty() {
        log::info!("`{}`: {} diagnostic(s)", data.name, def_map.diagnostics().len());
    }
    Ok(def_map)
}

/// Finds the language prelude module through the crate's extern prelude. A
/// crate that cannot see the prelude's crate simply has none.
fn resolve_prelude(def_map: &DefMap, text: &str) -> Option<ModuleId> {
    let path = Path::parse(text)?;
    if !matches!(path.kind(), PathKind::Plain | PathKind::Abs) {
        log::warn!("prelude path `{text}` must start with a crate name");
        return None;
    }
    let (first, rest) = path.segments().split_first()?;
    let krate_root = *def_map.extern_prelude().get(first)?;
    let module_path = ModPath::new(krate_root.krate, rest.to_vec());
    match def_map.module_for_path(&module_path) {
        Some((map, local_id)) => Some(map.module_id(local_id)),
        None => {
            log::warn!("prelude module `{text}` not found in `{}`", def_map.crate_name());
            None
        }
    }
}

/// Finished definition maps for a crate graph.
#[derive(Debug)]
pub struct DefDatabase {
    graph: CrateGraph,
    config: ResolveConfig,
    def_maps: FxHashMap<CrateId, Arc<DefMap>>,
    cancellation: Cancellation,
}

impl DefDatabase {
    pub fn new(graph: CrateGraph, config: ResolveConfig) -> Self {
        DefDatabase { graph, config, def_maps: FxHashMap::default(), cancellation: Cancellation::new() }
    }

    pub fn graph(&self) -> &CrateGraph {
        &self.graph
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    /// The token observed by every build started from this database.
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Builds (or returns the already built) map of one crate. Its
    /// dependencies must have been built first.
    pub fn build_crate(&mut self, krate: CrateId) -> Result<Arc<DefMap>, DefMapError> {
        if let Some(map) = self.def_maps.get(&krate) {
            return Ok(map.clone());
        }
        let def_map = build_def_map(&self.graph, krate, &self.def_maps, &self.config, &self.cancellation)?;
        let def_map = Arc::new(def_map);
        self.def_maps.insert(krate, def_map.clone());
        Ok(def_map)
    }

    /// Builds every crate in dependency order, stopping at the first failure.
    pub fn build_all(&mut self) -> Result<(), DefMapError> {
        for krate in self.graph.topological_order()? {
            self.build_crate(krate)?;
        }
        Ok(())
    }

    pub fn crate_def_map(&self, krate: CrateId) -> Option<Arc<DefMap>> {
        self.def_maps.get(&krate).cloned()
    }

    pub fn crate_def_map_by_name(&self, name: &str) -> Option<Arc<DefMap>> {
        self.crate_def_map(self.graph.crate_by_name(name)?)
    }
}
