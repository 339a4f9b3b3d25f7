//! Resolved visibility of a binding.

use crate::def_map::{DefMap, LocalModuleId, ModuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    /// Visible only inside this module and its descendants.
    Restricted(ModuleId),
}

impl Visibility {
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }

    /// Whether a binding with this visibility can be named from `from`, a
    /// module of `def_map`. Restricted bindings never leak across crates.
    pub fn is_visible_from(self, def_map: &DefMap, from: LocalModuleId) -> bool {
        match self {
            Visibility::Public => true,
            Visibility::Restricted(scope) => {
                scope.krate == def_map.krate() && def_map.is_ancestor_or_self(scope.local_id, from)
            }
        }
    }

    /// Partial order on visibilities: `Public` beats any restriction, and a
    /// restriction to a strict ancestor beats one to its descendant. Unrelated
    /// restrictions are incomparable and yield `false` both ways.
    pub fn is_more_permissive_than(self, other: Visibility, def_map: &DefMap) -> bool {
        match (self, other) {
            (Visibility::Public, Visibility::Public) => false,
            (Visibility::Public, Visibility::Restricted(_)) => true,
            (Visibility::Restricted(_), Visibility::Public) => false,
            (Visibility::Restricted(wide), Visibility::Restricted(narrow)) => {
                wide != narrow
                    && wide.krate == narrow.krate
                    && wide.krate == def_map.krate()
                    && def_map.is_ancestor_or_self(wide.local_id, narrow.local_id)
            }
        }
    }

    /// The narrower of two visibilities, as seen by a module both of them
    /// include. An import never makes an item more visible than declared.
    pub fn min(self, other: Visibility, def_map: &DefMap) -> Visibility {
        if self.is_more_permissive_than(other, def_map) {
            other
        } else {
            self
        }
    }
}
