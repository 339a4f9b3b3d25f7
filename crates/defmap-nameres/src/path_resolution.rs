//! Resolution of textual paths against a (possibly still growing) `DefMap`.

use crate::def_map::{DefMap, LocalModuleId, ModuleId};
use crate::path::{ModPath, Name, Path, PathKind};
use crate::per_ns::{PerNs, VisItem};
use crate::visibility::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// The path of a `use` declaration.
    Import,
    /// Any other path, e.g. in an expression or type.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvePathResult {
    pub resolved_def: PerNs,
    /// `false` means the failure may turn into a success once more imports
    /// are resolved; `true` means the answer is final.
    pub reached_fixedpoint: bool,
    /// The walk entered a dependency's (already complete) map.
    pub visited_other_crate: bool,
}

impl ResolvePathResult {
    fn empty(reached_fixedpoint: bool) -> ResolvePathResult {
        ResolvePathResult { resolved_def: PerNs::none(), reached_fixedpoint, visited_other_crate: false }
    }
}

impl DefMap {
    /// Parses and resolves `path` as seen from `module`. Unparsable text
    /// never resolves.
    pub fn resolve_path_str(&self, module: LocalModuleId, path: &str, mode: ResolveMode) -> ResolvePathResult {
        match Path::parse(path) {
            Some(path) => self.resolve_path(module, &path, mode),
            None => ResolvePathResult::empty(true),
        }
    }

    pub fn resolve_path(&self, original_module: LocalModuleId, path: &Path, mode: ResolveMode) -> ResolvePathResult {
        let mut segments = path.segments().iter();

        let mut curr_per_ns = match path.kind() {
            PathKind::Crate => PerNs::types(self.module_vis_item(self.module_id(self.root()))),
            PathKind::Super(level) => {
                let mut module = original_module;
                for _ in 0..level {
                    match self.module(module).parent {
                        Some(parent) => module = parent,
                        // `super` past the crate root can never resolve.
                        None => return ResolvePathResult::empty(true),
                    }
                }
                PerNs::types(self.module_vis_item(self.module_id(module)))
            }
            PathKind::Abs if self.edition.has_uniform_paths() => {
                let Some(first) = segments.next() else {
                    return ResolvePathResult::empty(true);
                };
                match self.extern_prelude.get(first) {
                    Some(&krate_root) => PerNs::types(self.module_vis_item(krate_root)),
                    // An `extern crate` still waiting in the queue may add it.
                    None => return ResolvePathResult::empty(false),
                }
            }
            PathKind::Abs => PerNs::types(self.module_vis_item(self.module_id(self.root()))),
            PathKind::Plain => {
                let Some(first) = segments.next() else {
                    return ResolvePathResult::empty(true);
                };
                let single = path.segments().len() == 1;
                let def = if mode == ResolveMode::Import && !self.edition.has_uniform_paths() {
                    self.resolve_name_in_crate_root_or_extern_prelude(first)
                } else {
                    self.resolve_name_in_module(original_module, first, single)
                };
                if def.is_empty() {
                    log::trace!("first segment `{first}` of `{path}` is not bound yet");
                    return ResolvePathResult::empty(false);
                }
                def
            }
        };

        let mut visited_other_crate = false;
        for segment in segments {
            // Only the type namespace can contain further names.
            let Some(curr) = curr_per_ns.types.as_ref() else {
                return ResolvePathResult::empty(false);
            };
            if !curr.is_mod_or_enum {
                return ResolvePathResult::empty(true);
            }
            let Some((target_map, target_module)) = self.module_for_path(&curr.path) else {
                return ResolvePathResult::empty(true);
            };
            let foreign = target_map.krate() != self.krate;
            visited_other_crate |= foreign;

            let def = match target_map.module(target_module).get(segment.as_str()) {
                Some(def) => def.filter_visibility(|vis| vis.is_visible_from(self, original_module)),
                None => PerNs::none(),
            };
            if def.is_empty() {
                // A dependency is finished, so a miss there is final. Here, a
                // pending import may still bind the name.
                return ResolvePathResult::empty(foreign);
            }
            curr_per_ns = def;
        }

        ResolvePathResult { resolved_def: curr_per_ns, reached_fixedpoint: true, visited_other_crate }
    }

    /// A plain name in scope of `module`: its own items first, then the
    /// extern prelude, then the language prelude. A lone name additionally
    /// falls back to `#[macro_use]` macros.
    fn resolve_name_in_module(&self, module: LocalModuleId, name: &Name, single_segment: bool) -> PerNs {
        let from_scope = self.module(module).get(name.as_str()).cloned().unwrap_or_default();
        let mut def = from_scope
            .or(self.resolve_in_extern_prelude(name))
            .or(self.resolve_in_prelude(name));
        if single_segment && def.macros.is_none() {
            def.macros = self.macro_use_prelude.get(name.as_str()).cloned();
        }
        def
    }

    /// 2015-edition import paths: relative to the crate root, falling back to
    /// crate names.
    fn resolve_name_in_crate_root_or_extern_prelude(&self, name: &Name) -> PerNs {
        let from_root = self.module(self.root()).get(name.as_str()).cloned().unwrap_or_default();
        from_root.or(self.resolve_in_extern_prelude(name))
    }

    fn resolve_in_extern_prelude(&self, name: &Name) -> PerNs {
        self.extern_prelude
            .get(name.as_str())
            .map_or_else(PerNs::none, |&root| PerNs::types(self.module_vis_item(root)))
    }

    fn resolve_in_prelude(&self, name: &Name) -> PerNs {
        let Some(prelude) = self.prelude else {
            return PerNs::none();
        };
        let Some(prelude_map) = self.def_map_for(prelude.krate) else {
            return PerNs::none();
        };
        match prelude_map.module(prelude.local_id).get(name.as_str()) {
            Some(def) if prelude.krate == self.krate => def.clone(),
            Some(def) => def.filter_visibility(Visibility::is_public),
            None => PerNs::none(),
        }
    }

    /// A module-or-enum item for any module in the crate graph.
    pub(crate) fn module_vis_item(&self, module: ModuleId) -> VisItem {
        match self.def_map_for(module.krate) {
            Some(map) => map.module(module.local_id).as_vis_item(Visibility::Public),
            None => VisItem::new(ModPath::root(module.krate), Visibility::Public, true),
        }
    }
}
