//! Namespaces and the per-namespace binding record.
//!
//! A single name can mean three unrelated things at once: a type (or
//! module), a value, and a macro. `PerNs` keeps one slot for each.

use std::fmt;

use defmap_item_tree::NamespaceShape;

use crate::def_map::DefMap;
use crate::path::ModPath;
use crate::visibility::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Namespace {
    Types,
    Values,
    Macros,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Types, Namespace::Values, Namespace::Macros];

    /// One-letter tag used in map dumps.
    pub fn short(self) -> char {
        match self {
            Namespace::Types => 't',
            Namespace::Values => 'v',
            Namespace::Macros => 'm',
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Namespace::Types => "types",
            Namespace::Values => "values",
            Namespace::Macros => "macros",
        })
    }
}

/// A reference to a declared entity, as seen through one binding.
///
/// The path identifies the entity; the visibility belongs to the binding,
/// so the same entity may be reachable with different visibilities through
/// different imports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisItem {
    pub path: ModPath,
    pub visibility: Visibility,
    /// Only modules and enums can have names resolved inside them.
    pub is_mod_or_enum: bool,
}

impl VisItem {
    pub fn new(path: ModPath, visibility: Visibility, is_mod_or_enum: bool) -> Self {
        VisItem { path, visibility, is_mod_or_enum }
    }

    pub fn with_visibility(&self, visibility: Visibility) -> VisItem {
        VisItem { visibility, ..self.clone() }
    }

    /// Same entity, regardless of the binding's visibility.
    pub fn same_item(&self, other: &VisItem) -> bool {
        self.path == other.path
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerNs {
    pub types: Option<VisItem>,
    pub values: Option<VisItem>,
    pub macros: Option<VisItem>,
}

impl PerNs {
    pub fn none() -> PerNs {
        PerNs::default()
    }

    pub fn types(item: VisItem) -> PerNs {
        PerNs { types: Some(item), ..PerNs::default() }
    }

    pub fn values(item: VisItem) -> PerNs {
        PerNs { values: Some(item), ..PerNs::default() }
    }

    pub fn macros(item: VisItem) -> PerNs {
        PerNs { macros: Some(item), ..PerNs::default() }
    }

    /// The same item in every namespace the declaration occupies.
    pub fn from_shape(item: VisItem, shape: NamespaceShape) -> PerNs {
        PerNs {
            types: shape.types.then(|| item.clone()),
            values: shape.values.then(|| item.clone()),
            macros: shape.macros.then_some(item),
        }
    }

    pub fn get(&self, ns: Namespace) -> Option<&VisItem> {
        match ns {
            Namespace::Types => self.types.as_ref(),
            Namespace::Values => self.values.as_ref(),
            Namespace::Macros => self.macros.as_ref(),
        }
    }

    pub fn set(&mut self, ns: Namespace, item: Option<VisItem>) {
        match ns {
            Namespace::Types => self.types = item,
            Namespace::Values => self.values = item,
            Namespace::Macros => self.macros = item,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_none() && self.values.is_none() && self.macros.is_none()
    }

    /// All three namespaces are bound.
    pub fn is_full(&self) -> bool {
        self.types.is_some() && self.values.is_some() && self.macros.is_some()
    }

    /// Keeps only the slots whose visibility passes `f`.
    pub fn filter_visibility(&self, mut f: impl FnMut(Visibility) -> bool) -> PerNs {
        let mut keep = |item: &Option<VisItem>| item.clone().filter(|item| f(item.visibility));
        PerNs { types: keep(&self.types), values: keep(&self.values), macros: keep(&self.macros) }
    }

    /// Re-exports every slot under `visibility`, as an import does. A slot
    /// keeps its own visibility where that is narrower.
    pub fn with_visibility_at_most(&self, visibility: Visibility, def_map: &DefMap) -> PerNs {
        let adjust = |item: &Option<VisItem>| {
            item.as_ref().map(|item| item.with_visibility(item.visibility.min(visibility, def_map)))
        };
        PerNs { types: adjust(&self.types), values: adjust(&self.values), macros: adjust(&self.macros) }
    }

    /// Fills the empty slots of `self` from `other`.
    pub fn or(self, other: PerNs) -> PerNs {
        PerNs {
            types: self.types.or(other.types),
            values: self.values.or(other.values),
            macros: self.macros.or(other.macros),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Namespace, &VisItem)> {
        Namespace::ALL.into_iter().filter_map(move |ns| self.get(ns).map(|item| (ns, item)))
    }
}

#[cfg(test)]
mod tests {
    use defmap_item_tree::{CrateId, Edition};
    use rustc_hash::FxHashMap;

    use super::*;
    use crate::def_map::{LocalModuleId, ModuleId};
    use crate::path::Name;

    fn item(name: &str, visibility: Visibility) -> VisItem {
        VisItem::new(ModPath::root(CrateId(0)).append(Name::new(name)), visibility, false)
    }

    fn private() -> Visibility {
        Visibility::Restricted(ModuleId { krate: CrateId(0), local_id: LocalModuleId::ROOT })
    }

    #[test]
    fn from_shape_fills_requested_slots() {
        let def = PerNs::from_shape(item("S", Visibility::Public), NamespaceShape::TYPES_AND_VALUES);
        assert!(def.types.is_some());
        assert!(def.values.is_some());
        assert!(def.macros.is_none());
        assert!(!def.is_full());
        assert_eq!(def.iter().map(|(ns, _)| ns).collect::<Vec<_>>(), [Namespace::Types, Namespace::Values]);
    }

    #[test]
    fn filter_and_adjust_visibility() {
        let def = PerNs { types: Some(item("T", Visibility::Public)), values: Some(item("v", private())), macros: None };

        let public_only = def.filter_visibility(Visibility::is_public);
        assert!(public_only.types.is_some());
        assert!(public_only.values.is_none());

        let def_map = DefMap::empty(CrateId(0), "test".to_string(), Edition::Edition2021, FxHashMap::default());
        let reexported = def.with_visibility_at_most(Visibility::Public, &def_map);
        assert_eq!(reexported.types.as_ref().unwrap().visibility, Visibility::Public);
        assert_eq!(reexported.values.as_ref().unwrap().visibility, private());
        assert!(reexported.types.unwrap().same_item(def.types.as_ref().unwrap()));

        let narrowed = def.with_visibility_at_most(private(), &def_map);
        assert!(narrowed.iter().all(|(_, item)| item.visibility == private()));
    }

    #[test]
    fn or_keeps_existing_slots() {
        let first = PerNs::types(item("a", Visibility::Public));
        let second = PerNs { types: Some(item("b", Visibility::Public)), values: Some(item("b", Visibility::Public)), macros: None };
        let merged = first.or(second);
        assert_eq!(merged.types.unwrap().path.last().unwrap().as_str(), "a");
        assert_eq!(merged.values.unwrap().path.last().unwrap().as_str(), "b");
    }
}
