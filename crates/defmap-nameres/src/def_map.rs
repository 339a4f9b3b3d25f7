//! The definition map of one crate.
//!
//! A `DefMap` owns an arena of `ModuleData`, one per module and per enum,
//! addressed by `LocalModuleId`. Parents are stored as indices, children by
//! name, so the tree has no owning back-references. Dependencies are read
//! through shared, already-frozen `DefMap`s and are never mutated.

use std::fmt;

use defmap_item_tree::{CrateId, Edition};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use triomphe::Arc;

use crate::error::DefDiagnostic;
use crate::path::{ModPath, Name};
use crate::per_ns::{PerNs, VisItem};
use crate::visibility::Visibility;

/// Index of a module inside its crate's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalModuleId(u32);

impl LocalModuleId {
    pub const ROOT: LocalModuleId = LocalModuleId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A module anywhere in the crate graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    pub krate: CrateId,
    pub local_id: LocalModuleId,
}

impl ModuleId {
    pub fn crate_root(krate: CrateId) -> Self {
        ModuleId { krate, local_id: LocalModuleId::ROOT }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Module,
    /// An enum, modeled as a module whose items are its variants.
    Enum,
}

#[derive(Debug, Clone)]
pub struct ModuleData {
    pub path: ModPath,
    pub parent: Option<LocalModuleId>,
    pub kind: ModuleKind,
    pub children: IndexMap<Name, LocalModuleId>,
    /// Everything nameable in this module, declared or imported.
    pub visible_items: IndexMap<Name, PerNs>,
}

impl ModuleData {
    pub(crate) fn new(path: ModPath, parent: Option<LocalModuleId>, kind: ModuleKind) -> Self {
        ModuleData { path, parent, kind, children: IndexMap::new(), visible_items: IndexMap::new() }
    }

    pub fn get(&self, name: &str) -> Option<&PerNs> {
        self.visible_items.get(name)
    }

    /// Module-or-enum item pointing at this module.
    pub fn as_vis_item(&self, visibility: Visibility) -> VisItem {
        VisItem::new(self.path.clone(), visibility, true)
    }
}

pub struct DefMap {
    pub(crate) krate: CrateId,
    pub(crate) crate_name: String,
    pub(crate) edition: Edition,
    pub(crate) modules: Vec<ModuleData>,
    /// Crate names usable as the first segment of any path.
    pub(crate) extern_prelude: IndexMap<Name, ModuleId>,
    /// Macros brought in by `#[macro_use] extern crate`.
    pub(crate) macro_use_prelude: IndexMap<Name, VisItem>,
    /// Module whose public names are implicitly in scope everywhere.
    pub(crate) prelude: Option<ModuleId>,
    /// Every transitive dependency, frozen.
    pub(crate) deps: FxHashMap<CrateId, Arc<DefMap>>,
    pub(crate) diagnostics: Vec<DefDiagnostic>,
}

impl DefMap {
    pub(crate) fn empty(
        krate: CrateId,
        crate_name: String,
        edition: Edition,
        deps: FxHashMap<CrateId, Arc<DefMap>>,
    ) -> DefMap {
        let root = ModuleData::new(ModPath::root(krate), None, ModuleKind::Module);
        DefMap {
            krate,
            crate_name,
            edition,
            modules: vec![root],
            extern_prelude: IndexMap::new(),
            macro_use_prelude: IndexMap::new(),
            prelude: None,
            deps,
            diagnostics: Vec::new(),
        }
    }

    pub fn krate(&self) -> CrateId {
        self.krate
    }

    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    pub fn root(&self) -> LocalModuleId {
        LocalModuleId::ROOT
    }

    pub fn module_id(&self, local_id: LocalModuleId) -> ModuleId {
        ModuleId { krate: self.krate, local_id }
    }

    pub fn module(&self, id: LocalModuleId) -> &ModuleData {
        &self.modules[id.index()]
    }

    pub(crate) fn module_mut(&mut self, id: LocalModuleId) -> &mut ModuleData {
        &mut self.modules[id.index()]
    }

    pub fn modules(&self) -> impl Iterator<Item = (LocalModuleId, &ModuleData)> {
        self.modules.iter().enumerate().map(|(idx, data)| (LocalModuleId(idx as u32), data))
    }

    pub(crate) fn alloc_module(&mut self, data: ModuleData) -> LocalModuleId {
        let id = LocalModuleId(self.modules.len() as u32);
        self.modules.push(data);
        id
    }

    /// The binding of `name` in `module`, across all namespaces.
    pub fn get(&self, module: LocalModuleId, name: &str) -> Option<&PerNs> {
        self.module(module).get(name)
    }

    pub fn extern_prelude(&self) -> &IndexMap<Name, ModuleId> {
        &self.extern_prelude
    }

    pub fn macro_use_prelude(&self) -> &IndexMap<Name, VisItem> {
        &self.macro_use_prelude
    }

    pub fn prelude(&self) -> Option<ModuleId> {
        self.prelude
    }

    pub fn diagnostics(&self) -> &[DefDiagnostic] {
        &self.diagnostics
    }

    /// The map of `krate`: this one or a dependency's.
    pub fn def_map_for(&self, krate: CrateId) -> Option<&DefMap> {
        if krate == self.krate {
            Some(self)
        } else {
            self.deps.get(&krate).map(|map| &**map)
        }
    }

    pub fn dependency_crates(&self) -> impl Iterator<Item = CrateId> + '_ {
        self.deps.keys().copied()
    }

    /// Finds the module (or enum) data that a module-or-enum path points to,
    /// in whichever crate owns it.
    pub fn module_for_path(&self, path: &ModPath) -> Option<(&DefMap, LocalModuleId)> {
        let def_map = self.def_map_for(path.krate())?;
        let mut current = LocalModuleId::ROOT;
        for segment in path.segments() {
            current = *def_map.module(current).children.get(segment.as_str())?;
        }
        Some((def_map, current))
    }

    /// Local module at `path` in this crate.
    pub fn module_by_path(&self, path: &ModPath) -> Option<LocalModuleId> {
        if path.krate() != self.krate {
            return None;
        }
        self.module_for_path(path).map(|(_, id)| id)
    }

    /// Local module named by `a::b` text relative to the root.
    pub fn module_by_text(&self, text: &str) -> Option<LocalModuleId> {
        let segments = text
            .split("::")
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "crate")
            .map(Name::new)
            .collect();
        self.module_by_path(&ModPath::new(self.krate, segments))
    }

    /// `module` itself, then its parent, up to the root.
    pub fn ancestors(&self, module: LocalModuleId) -> impl Iterator<Item = LocalModuleId> + '_ {
        std::iter::successors(Some(module), move |&id| self.module(id).parent)
    }

    pub fn is_ancestor_or_self(&self, ancestor: LocalModuleId, module: LocalModuleId) -> bool {
        self.ancestors(module).any(|id| id == ancestor)
    }

    /// Renders an item path with crate names instead of ids.
    pub fn display_path(&self, path: &ModPath) -> String {
        if path.krate() == self.krate {
            return path.display_with("crate");
        }
        let root = self.def_map_for(path.krate()).map_or("<unknown>", |map| map.crate_name());
        path.display_with(root)
    }

    /// A stable text rendering of every module and its bindings.
    ///
    /// Modules are sorted by path and names alphabetically; each namespace a
    /// name occupies is tagged `t`, `v` or `m`, followed by `=target` when the
    /// binding was imported from somewhere else.
    pub fn dump(&self) -> String {
        let mut modules: Vec<(String, &ModuleData)> =
            self.modules.iter().map(|data| (self.display_path(&data.path), data)).collect();
        modules.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = String::new();
        for (path, data) in modules {
            out.push_str(&path);
            out.push('\n');
            let mut names: Vec<(&Name, &PerNs)> = data.visible_items.iter().collect();
            names.sort_by(|a, b| a.0.cmp(b.0));
            for (name, def) in names {
                if def.is_empty() {
                    continue;
                }
                let own_path = data.path.append(name.clone());
                let tags: Vec<String> = def
                    .iter()
                    .map(|(ns, item)| {
                        if item.path == own_path {
                            ns.short().to_string()
                        } else {
                            format!("{}={}", ns.short(), self.display_path(&item.path))
                        }
                    })
                    .collect();
                out.push_str(&format!("{}: {}\n", name, tags.join(" ")));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Debug for DefMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut deps: Vec<_> = self.deps.keys().collect();
        deps.sort();
        f.debug_struct("DefMap")
            .field("krate", &self.krate)
            .field("crate_name", &self.crate_name)
            .field("edition", &self.edition)
            .field("modules", &self.modules)
            .field("extern_prelude", &self.extern_prelude)
            .field("prelude", &self.prelude)
            .field("deps", &deps)
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}
