// Pass 2: resolve imports to a fixed point.
//
// Every pass tries each pending import once. Whatever resolves is written
// into its module and, for globs, recorded as a standing edge so that names
// later added to the glob's source keep flowing into the importer. The loop
// ends after a pass that resolves nothing.

use rustc_hash::FxHashMap;

use crate::db::Cancellation;
use crate::def_map::{DefMap, LocalModuleId, ModuleId};
use crate::error::{DefDiagnostic, DefMapError};
use crate::import::{Import, ImportDirective, ImportKind, PartialResolvedImport};
use crate::path::Name;
use crate::path_resolution::ResolveMode;
use crate::per_ns::{Namespace, PerNs, VisItem};
use crate::visibility::Visibility;

/// Where a binding came from, for the override rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportType {
    /// A named `use` or `extern crate`.
    Named,
    /// A glob import whose names are taken from this module.
    Glob(ModuleId),
}

/// Slots whose current value came from a glob, keyed by module and name,
/// with the module the glob reads from.
#[derive(Debug, Default)]
struct PerNsGlobImports {
    types: FxHashMap<(LocalModuleId, Name), ModuleId>,
    values: FxHashMap<(LocalModuleId, Name), ModuleId>,
    macros: FxHashMap<(LocalModuleId, Name), ModuleId>,
}

impl PerNsGlobImports {
    fn get_mut(&mut self, ns: Namespace) -> &mut FxHashMap<(LocalModuleId, Name), ModuleId> {
        match ns {
            Namespace::Types => &mut self.types,
            Namespace::Values => &mut self.values,
            Namespace::Macros => &mut self.macros,
        }
    }
}

pub(crate) struct DefCollector<'a> {
    def_map: DefMap,
    unresolved_imports: Vec<ImportDirective>,
    resolved_imports: Vec<ImportDirective>,
    /// source module -> modules that glob-import it, with the visibility of
    /// each glob import
    glob_imports: FxHashMap<LocalModuleId, Vec<(LocalModuleId, Visibility)>>,
    from_glob_import: PerNsGlobImports,
    /// Direct dependencies by extern-prelude name; `extern crate` resolves
    /// against these only.
    dependencies: FxHashMap<Name, ModuleId>,
    recursion_limit: usize,
    cancellation: &'a Cancellation,
}

impl<'a> DefCollector<'a> {
    pub(crate) fn new(
        def_map: DefMap,
        imports: Vec<Import>,
        recursion_limit: usize,
        cancellation: &'a Cancellation,
    ) -> Self {
        let dependencies = def_map.extern_prelude.iter().map(|(name, &module)| (name.clone(), module)).collect();
        DefCollector {
            def_map,
            unresolved_imports: imports.into_iter().map(ImportDirective::new).collect(),
            resolved_imports: Vec::new(),
            glob_imports: FxHashMap::default(),
            from_glob_import: PerNsGlobImports::default(),
            dependencies,
            recursion_limit,
            cancellation,
        }
    }

    /// Runs the fixed-point loop and returns the number of passes, the last
    /// of which resolved nothing. On error the half-built map is dropped.
    pub(crate) fn collect(&mut self) -> Result<usize, DefMapError> {
        let mut pass = 0usize;
        loop {
            self.cancellation.check()?;
            pass += 1;
            let pending = self.unresolved_imports.len();
            let resolved = self.resolve_imports()?;
            log::debug!(
                "`{}` pass {pass}: resolved {resolved} of {pending} pending import(s)",
                self.def_map.crate_name()
            );
            if resolved == 0 {
                break;
            }
        }

        for directive in &self.unresolved_imports {
            let import = &directive.import;
            let module = self.def_map.display_path(&self.def_map.module(import.module).path);
            let path = match import.kind {
                ImportKind::Glob => format!("{}::*", import.path),
                _ => import.path.to_string(),
            };
            log::debug!("unresolved import `{path}` in `{module}`");
            self.def_map.diagnostics.push(DefDiagnostic::UnresolvedImport { module, path });
        }
        Ok(pass)
    }

    pub(crate) fn finish(self) -> DefMap {
        self.def_map
    }

    pub(crate) fn unresolved_imports(&self) -> &[ImportDirective] {
        &self.unresolved_imports
    }

    pub(crate) fn resolved_imports(&self) -> &[ImportDirective] {
        &self.resolved_imports
    }

    #[cfg(test)]
    pub(crate) fn has_glob_edge(&self, source: LocalModuleId, importer: LocalModuleId) -> bool {
        self.glob_imports.get(&source).is_some_and(|edges| edges.iter().any(|(m, _)| *m == importer))
    }

    #[cfg(test)]
    pub(crate) fn def_map(&self) -> &DefMap {
        &self.def_map
    }

    /// One pass over the pending imports. Returns how many left the pool.
    fn resolve_imports(&mut self) -> Result<usize, DefMapError> {
        let mut resolved = 0;
        for directive in std::mem::take(&mut self.unresolved_imports) {
            let status = self.resolve_import(&directive.import);
            let directive = directive.with_status(status);
            match directive.status {
                PartialResolvedImport::Unresolved => self.unresolved_imports.push(directive),
                PartialResolvedImport::Indeterminate(_) | PartialResolvedImport::Resolved(_) => {
                    self.record_resolved_import(&directive)?;
                    self.resolved_imports.push(directive);
                    resolved += 1;
                }
            }
        }
        Ok(resolved)
    }

    fn resolve_import(&self, import: &Import) -> PartialResolvedImport {
        log::trace!("resolving import `{}` ({:?})", import.path, import.kind);
        if import.is_extern_crate() {
            let Some(crate_name) = import.path.first_segment() else {
                return PartialResolvedImport::Unresolved;
            };
            let root = if crate_name.as_str() == "self" {
                Some(self.def_map.module_id(self.def_map.root()))
            } else {
                self.dependencies.get(crate_name).copied()
            };
            return match root {
                Some(root) => PartialResolvedImport::Resolved(PerNs::types(self.def_map.module_vis_item(root))),
                None => PartialResolvedImport::Unresolved,
            };
        }

        let res = self.def_map.resolve_path(import.module, &import.path, ResolveMode::Import);
        let def = res.resolved_def;
        if def.is_empty() || !res.reached_fixedpoint {
            PartialResolvedImport::Unresolved
        } else if res.visited_other_crate || def.is_full() {
            PartialResolvedImport::Resolved(def)
        } else {
            PartialResolvedImport::Indeterminate(def)
        }
    }

    fn record_resolved_import(&mut self, directive: &ImportDirective) -> Result<(), DefMapError> {
        let Some(def) = directive.status.namespaces() else {
            return Ok(());
        };
        let import = &directive.import;
        let module = import.module;

        match import.kind {
            ImportKind::Named | ImportKind::ExternCrate { .. } => {
                if let ImportKind::ExternCrate { macro_use } = import.kind {
                    if module == self.def_map.root() {
                        self.record_extern_crate_at_root(import.name.as_ref(), def, macro_use);
                    }
                }
                if let Some(name) = &import.name {
                    log::trace!("binding `{name}` in module {module:?} from `{}`", import.path);
                    let def = def.with_visibility_at_most(import.visibility, &self.def_map);
                    self.update(module, &[(name.clone(), def)], ImportType::Named)?;
                }
            }
            ImportKind::Glob => {
                let Some(target) = def.types.as_ref().filter(|item| item.is_mod_or_enum) else {
                    log::debug!("glob import `{}::*` does not name a module or enum", import.path);
                    return Ok(());
                };
                let Some((target_map, target_module)) = self.def_map.module_for_path(&target.path) else {
                    return Ok(());
                };
                let source = target_map.module_id(target_module);

                if source.krate != self.def_map.krate() {
                    // A finished dependency never changes: copy its public
                    // names once, no edge needed.
                    let items: Vec<(Name, PerNs)> = target_map
                        .module(target_module)
                        .visible_items
                        .iter()
                        .map(|(name, def)| {
                            let public = def.filter_visibility(Visibility::is_public);
                            (name.clone(), public.with_visibility_at_most(import.visibility, &self.def_map))
                        })
                        .filter(|(_, def)| !def.is_empty())
                        .collect();
                    log::trace!("glob-importing {} name(s) from `{}`", items.len(), import.path);
                    self.update(module, &items, ImportType::Glob(source))?;
                } else {
                    let items: Vec<(Name, PerNs)> = self
                        .def_map
                        .module(target_module)
                        .visible_items
                        .iter()
                        .map(|(name, def)| {
                            let visible = def.filter_visibility(|vis| vis.is_visible_from(&self.def_map, module));
                            (name.clone(), visible.with_visibility_at_most(import.visibility, &self.def_map))
                        })
                        .filter(|(_, def)| !def.is_empty())
                        .collect();
                    log::trace!("glob-importing {} name(s) from `{}`", items.len(), import.path);
                    self.update(module, &items, ImportType::Glob(source))?;

                    let edges = self.glob_imports.entry(target_module).or_default();
                    if !edges.contains(&(module, import.visibility)) {
                        edges.push((module, import.visibility));
                    }
                }
            }
        }
        Ok(())
    }

    /// `extern crate` at the root extends the extern prelude, and with
    /// `#[macro_use]` brings the crate's public macros into every module.
    fn record_extern_crate_at_root(&mut self, name: Option<&Name>, def: &PerNs, macro_use: bool) {
        let Some(krate_root) = def.types.as_ref() else { return };
        let Some((dep_map, dep_root)) = self.def_map.module_for_path(&krate_root.path) else { return };
        let dep_root = dep_map.module_id(dep_root);

        let macros: Vec<(Name, VisItem)> = if macro_use {
            dep_map
                .module(dep_root.local_id)
                .visible_items
                .iter()
                .filter_map(|(name, def)| {
                    let item = def.macros.as_ref().filter(|item| item.visibility.is_public())?;
                    Some((name.clone(), item.clone()))
                })
                .collect()
        } else {
            Vec::new()
        };

        if let Some(name) = name {
            self.def_map.extern_prelude.insert(name.clone(), dep_root);
        }
        for (name, item) in macros {
            self.def_map.macro_use_prelude.entry(name).or_insert(item);
        }
    }

    fn update(
        &mut self,
        module: LocalModuleId,
        resolutions: &[(Name, PerNs)],
        import_type: ImportType,
    ) -> Result<(), DefMapError> {
        self.update_recursive(module, resolutions, import_type, 0)
    }

    /// Merges `resolutions` into `module` and forwards whatever changed to
    /// every module glob-importing it.
    fn update_recursive(
        &mut self,
        module: LocalModuleId,
        resolutions: &[(Name, PerNs)],
        import_type: ImportType,
        depth: usize,
    ) -> Result<(), DefMapError> {
        if depth > self.recursion_limit {
            return Err(DefMapError::GlobRecursionLimit {
                krate: self.def_map.crate_name().to_string(),
                module: self.def_map.display_path(&self.def_map.module(module).path),
                limit: self.recursion_limit,
            });
        }

        let mut changed: Vec<(Name, PerNs)> = Vec::new();
        for (name, def) in resolutions {
            let delta = self.push_resolution_from_import(module, name, def, import_type);
            if !delta.is_empty() {
                changed.push((name.clone(), delta));
            }
        }
        if changed.is_empty() {
            return Ok(());
        }

        let source = self.def_map.module_id(module);
        let importers = self.glob_imports.get(&module).cloned().unwrap_or_default();
        for (importer, glob_visibility) in importers {
            let forwarded: Vec<(Name, PerNs)> = changed
                .iter()
                .map(|(name, def)| {
                    let visible = def.filter_visibility(|vis| vis.is_visible_from(&self.def_map, importer));
                    (name.clone(), visible.with_visibility_at_most(glob_visibility, &self.def_map))
                })
                .filter(|(_, def)| !def.is_empty())
                .collect();
            if forwarded.is_empty() {
                continue;
            }
            log::trace!("propagating {} binding(s) from {module:?} to {importer:?}", forwarded.len());
            self.update_recursive(importer, &forwarded, ImportType::Glob(source), depth + 1)?;
        }
        Ok(())
    }

    /// Merges one binding into `module`, slot by slot, and returns the slots
    /// that actually changed.
    ///
    /// - empty slot: filled;
    /// - glob-filled slot, named binding: overridden;
    /// - glob-filled slot, glob binding: kept, unless the binding is an
    ///   update arriving from the same glob source;
    /// - declared or named slot, glob binding: kept;
    /// - declared or named slot, named binding for another item: kept, and
    ///   reported as ambiguous.
    fn push_resolution_from_import(
        &mut self,
        module: LocalModuleId,
        name: &Name,
        def: &PerNs,
        import_type: ImportType,
    ) -> PerNs {
        let mut delta = PerNs::none();
        for (ns, new) in def.iter() {
            let key = (module, name.clone());
            let existing = self.def_map.module(module).get(name.as_str()).and_then(|d| d.get(ns)).cloned();
            let glob_source = self.from_glob_import.get_mut(ns).get(&key).copied();

            let replace = match (&existing, glob_source, import_type) {
                (None, _, _) => true,
                (Some(existing), Some(_), ImportType::Named) => existing != new,
                (Some(existing), Some(current), ImportType::Glob(incoming)) => {
                    current == incoming && existing != new
                }
                (Some(_), None, ImportType::Glob(_)) => false,
                (Some(existing), None, ImportType::Named) => {
                    if !existing.same_item(new) {
                        self.report_ambiguity(module, name, ns, existing, new);
                    }
                    false
                }
            };

            // A named import takes over a glob-sourced slot even when it
            // points at the same item.
            let globs = self.from_glob_import.get_mut(ns);
            match import_type {
                ImportType::Named if replace || glob_source.is_some() => {
                    globs.remove(&key);
                }
                ImportType::Glob(source) if replace => {
                    globs.insert(key, source);
                }
                _ => {}
            }

            if replace {
                self.def_map
                    .module_mut(module)
                    .visible_items
                    .entry(name.clone())
                    .or_default()
                    .set(ns, Some(new.clone()));
                delta.set(ns, Some(new.clone()));
            }
        }
        delta
    }

    fn report_ambiguity(&mut self, module: LocalModuleId, name: &Name, ns: Namespace, existing: &VisItem, new: &VisItem) {
        let diagnostic = DefDiagnostic::AmbiguousImport {
            module: self.def_map.display_path(&self.def_map.module(module).path),
            name: name.to_string(),
            namespace: ns,
            existing: self.def_map.display_path(&existing.path),
            rejected: self.def_map.display_path(&new.path),
        };
        log::debug!("{diagnostic}");
        if !self.def_map.diagnostics.contains(&diagnostic) {
            self.def_map.diagnostics.push(diagnostic);
        }
    }
}
