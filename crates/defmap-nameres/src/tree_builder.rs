// Pass 1: walk the item tree once, creating a `ModuleData` for every module
// and enum, declaring every named item, and queueing every import.

use defmap_item_tree::{ExternCrateItem, Item, ItemKind, ModuleItems, RawVisibility, UseItem};

use crate::def_map::{DefMap, LocalModuleId, ModuleData, ModuleKind};
use crate::error::DefDiagnostic;
use crate::import::{Import, ImportKind};
use crate::path::{Name, Path, PathKind};
use crate::per_ns::{Namespace, PerNs, VisItem};
use crate::visibility::Visibility;

/// Populates `def_map` from the crate's root module and returns the
/// imports, in declaration order (a module's own imports before those of
/// its children).
pub(crate) fn build_module_tree(def_map: &mut DefMap, root: &ModuleItems) -> Vec<Import> {
    let mut builder = TreeBuilder { def_map, imports: Vec::new() };
    builder.collect_module(LocalModuleId::ROOT, root, &[]);
    log::debug!(
        "built module tree for `{}`: {} module(s), {} import(s)",
        builder.def_map.crate_name(),
        builder.def_map.modules.len(),
        builder.imports.len()
    );
    builder.imports
}

struct TreeBuilder<'a> {
    def_map: &'a mut DefMap,
    imports: Vec<Import>,
}

impl TreeBuilder<'_> {
    /// `syntactic_chain` holds the names of the enclosing syntactic modules,
    /// root excluded, ending with `module`'s own name.
    fn collect_module(&mut self, module: LocalModuleId, items: &ModuleItems, syntactic_chain: &[&str]) {
        for use_item in &items.uses {
            self.collect_use(module, use_item, syntactic_chain);
        }
        for extern_crate in &items.extern_crates {
            self.collect_extern_crate(module, extern_crate, syntactic_chain);
        }
        for item in &items.items {
            self.collect_item(module, item, syntactic_chain);
        }
    }

    fn collect_item(&mut self, module: LocalModuleId, item: &Item, syntactic_chain: &[&str]) {
        let Some(name) = item.name.as_deref() else {
            self.malformed(module, "item");
            return;
        };
        let visibility = self.resolve_visibility(module, syntactic_chain, &item.visibility, name);
        let name = Name::new(name);

        match &item.kind {
            ItemKind::Module(body) => {
                let Some(child) = self.alloc_child(module, &name, ModuleKind::Module) else { return };
                let def = PerNs::types(self.def_map.module(child).as_vis_item(visibility));
                self.declare(module, &name, def);

                let mut chain = syntactic_chain.to_vec();
                chain.push(name.as_str());
                self.collect_module(child, body, &chain);
            }
            ItemKind::Enum { variants } => {
                let Some(enum_id) = self.alloc_child(module, &name, ModuleKind::Enum) else { return };
                let def = PerNs::types(self.def_map.module(enum_id).as_vis_item(visibility));
                self.declare(module, &name, def);

                // Variants are as visible as their enum.
                for variant in variants {
                    let Some(variant_name) = variant.name.as_deref() else {
                        self.malformed(enum_id, "enum variant");
                        continue;
                    };
                    let variant_name = Name::new(variant_name);
                    let path = self.def_map.module(enum_id).path.append(variant_name.clone());
                    let def = PerNs::from_shape(VisItem::new(path, visibility, false), variant.shape.namespaces());
                    self.declare(enum_id, &variant_name, def);
                }
            }
            ItemKind::Macro { macro_export: true } => {
                let root = self.def_map.root();
                let path = self.def_map.module(root).path.append(name.clone());
                self.declare(root, &name, PerNs::macros(VisItem::new(path, Visibility::Public, false)));
            }
            kind => {
                let path = self.def_map.module(module).path.append(name.clone());
                let def = PerNs::from_shape(VisItem::new(path, visibility, false), kind.namespaces());
                self.declare(module, &name, def);
            }
        }
    }

    fn collect_use(&mut self, module: LocalModuleId, use_item: &UseItem, syntactic_chain: &[&str]) {
        // `a::*` and `a` with `glob` set mean the same thing.
        let (text, glob) = match use_item.path.trim_end().strip_suffix("::*") {
            Some(prefix) => (prefix, true),
            None => (use_item.path.as_str(), use_item.glob),
        };
        let Some(path) = Path::parse(text) else {
            self.malformed(module, "use path");
            return;
        };
        let (kind, name) = if glob {
            (ImportKind::Glob, None)
        } else {
            let name = match use_item.alias.as_deref() {
                Some(alias) => Name::new(alias),
                None => match path.last_segment() {
                    Some(last) => last.clone(),
                    None => {
                        // `use super;` and friends bind nothing without `as`.
                        self.malformed(module, "use path");
                        return;
                    }
                },
            };
            if name.is_underscore() {
                log::trace!("skipping underscore import `{}`", path);
                return;
            }
            (ImportKind::Named, Some(name))
        };
        let label = name.as_ref().map_or("*", Name::as_str).to_string();
        let visibility = self.resolve_visibility(module, syntactic_chain, &use_item.visibility, &label);
        self.imports.push(Import { module, path, name, visibility, kind });
    }

    fn collect_extern_crate(&mut self, module: LocalModuleId, item: &ExternCrateItem, syntactic_chain: &[&str]) {
        let Some(crate_name) = item.name.as_deref() else {
            self.malformed(module, "extern crate");
            return;
        };
        let binding = Name::new(item.alias.as_deref().unwrap_or(crate_name));
        let visibility = self.resolve_visibility(module, syntactic_chain, &item.visibility, binding.as_str());
        let name = (!binding.is_underscore()).then_some(binding);
        self.imports.push(Import {
            module,
            path: Path::plain(Name::new(crate_name)),
            name,
            visibility,
            kind: ImportKind::ExternCrate { macro_use: item.macro_use },
        });
    }

    fn alloc_child(&mut self, parent: LocalModuleId, name: &Name, kind: ModuleKind) -> Option<LocalModuleId> {
        if self.def_map.module(parent).children.contains_key(name) {
            self.duplicate(parent, name, Namespace::Types);
            return None;
        }
        let path = self.def_map.module(parent).path.append(name.clone());
        let child = self.def_map.alloc_module(ModuleData::new(path, Some(parent), kind));
        self.def_map.module_mut(parent).children.insert(name.clone(), child);
        Some(child)
    }

    /// Binds a declared item. A namespace slot that is already taken keeps
    /// its first declaration.
    fn declare(&mut self, module: LocalModuleId, name: &Name, def: PerNs) {
        let mut duplicates = Vec::new();
        {
            let slot = self.def_map.module_mut(module).visible_items.entry(name.clone()).or_default();
            for (ns, item) in def.iter() {
                if slot.get(ns).is_some() {
                    duplicates.push(ns);
                } else {
                    slot.set(ns, Some(item.clone()));
                }
            }
        }
        for ns in duplicates {
            self.duplicate(module, name, ns);
        }
    }

    /// Maps a declared visibility onto the module tree.
    fn resolve_visibility(
        &mut self,
        module: LocalModuleId,
        syntactic_chain: &[&str],
        raw: &RawVisibility,
        item_name: &str,
    ) -> Visibility {
        match raw {
            RawVisibility::Public => Visibility::Public,
            RawVisibility::Private | RawVisibility::SelfModule => {
                Visibility::Restricted(self.def_map.module_id(module))
            }
            RawVisibility::Crate => Visibility::Restricted(self.def_map.module_id(self.def_map.root())),
            RawVisibility::Super => match self.def_map.module(module).parent {
                Some(parent) => Visibility::Restricted(self.def_map.module_id(parent)),
                None => {
                    log::warn!("`pub(super)` on `{item_name}` at the crate root of `{}`", self.def_map.crate_name());
                    Visibility::Public
                }
            },
            RawVisibility::In(text) => match self.resolve_restricted_path(module, syntactic_chain, text) {
                Some(target) => Visibility::Restricted(self.def_map.module_id(target)),
                None => {
                    let module_path = self.module_display(module);
                    log::warn!("visibility `pub(in {text})` on `{item_name}` in `{module_path}` degraded to `pub`");
                    self.def_map.diagnostics.push(DefDiagnostic::UnresolvedVisibility {
                        module: module_path,
                        name: item_name.to_string(),
                        path: text.clone(),
                    });
                    Visibility::Public
                }
            },
        }
    }

    /// Translates `pub(in path)` into one of `module`'s ancestors by walking
    /// the syntactic chain and the semantic parent links in lockstep.
    fn resolve_restricted_path(
        &self,
        module: LocalModuleId,
        syntactic_chain: &[&str],
        text: &str,
    ) -> Option<LocalModuleId> {
        let path = Path::parse(text)?;
        let uniform = self.def_map.edition().has_uniform_paths();
        let mut target: Vec<&str> = match path.kind() {
            PathKind::Crate => Vec::new(),
            PathKind::Super(level) => {
                let keep = syntactic_chain.len().checked_sub(level as usize)?;
                syntactic_chain[..keep].to_vec()
            }
            // Before 2018, `pub(in a::b)` and `pub(in ::a::b)` were
            // crate-relative.
            PathKind::Plain | PathKind::Abs if !uniform => Vec::new(),
            PathKind::Plain | PathKind::Abs => return None,
        };
        target.extend(path.segments().iter().map(Name::as_str));

        // Semantic ancestors, root first, lined up with the syntactic chain.
        let mut semantic: Vec<LocalModuleId> = self.def_map.ancestors(module).collect();
        semantic.reverse();
        if semantic.len() != syntactic_chain.len() + 1 || target.len() > syntactic_chain.len() {
            return None;
        }
        for (depth, (&syntactic, &semantic_id)) in syntactic_chain.iter().zip(&semantic[1..]).enumerate() {
            if depth >= target.len() {
                break;
            }
            let semantic_name = self.def_map.module(semantic_id).path.last().map(Name::as_str);
            if syntactic != target[depth] || semantic_name != Some(syntactic) {
                return None;
            }
        }
        Some(semantic[target.len()])
    }

    fn module_display(&self, module: LocalModuleId) -> String {
        self.def_map.display_path(&self.def_map.module(module).path)
    }

    fn malformed(&mut self, module: LocalModuleId, what: &str) {
        let module_path = self.module_display(module);
        log::warn!("skipping {what} without a name in `{module_path}`");
        self.def_map
            .diagnostics
            .push(DefDiagnostic::MalformedItem { module: module_path, what: what.to_string() });
    }

    fn duplicate(&mut self, module: LocalModuleId, name: &Name, namespace: Namespace) {
        let module_path = self.module_display(module);
        log::debug!("duplicate definition of `{name}` ({namespace}) in `{module_path}`");
        self.def_map.diagnostics.push(DefDiagnostic::DuplicateDefinition {
            module: module_path,
            name: name.to_string(),
            namespace,
        });
    }
}
