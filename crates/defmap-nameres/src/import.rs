//! Pending imports and their resolution status.

use crate::def_map::LocalModuleId;
use crate::path::{Name, Path};
use crate::per_ns::PerNs;
use crate::visibility::Visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `use a::b;` or `use a::b as c;`
    Named,
    /// `use a::*;`
    Glob,
    /// `extern crate a;`
    ExternCrate { macro_use: bool },
}

/// One `use` leaf or `extern crate`, waiting to be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The module containing the declaration.
    pub module: LocalModuleId,
    pub path: Path,
    /// The name this import binds; `None` for globs and `as _`.
    pub name: Option<Name>,
    pub visibility: Visibility,
    pub kind: ImportKind,
}

impl Import {
    pub fn is_glob(&self) -> bool {
        self.kind == ImportKind::Glob
    }

    pub fn is_extern_crate(&self) -> bool {
        matches!(self.kind, ImportKind::ExternCrate { .. })
    }
}

/// How far resolution of an import got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartialResolvedImport {
    /// Nothing yet; another pass may do better.
    Unresolved,
    /// Resolved in some namespaces and no further progress is possible
    /// without risking non-termination; applied as is.
    Indeterminate(PerNs),
    /// Resolved in every namespace, or through a finished dependency.
    Resolved(PerNs),
}

impl PartialResolvedImport {
    pub fn namespaces(&self) -> Option<&PerNs> {
        match self {
            PartialResolvedImport::Unresolved => None,
            PartialResolvedImport::Indeterminate(def) | PartialResolvedImport::Resolved(def) => Some(def),
        }
    }
}

/// An import together with its latest status. Each pass produces a fresh
/// directive instead of updating the old one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    pub import: Import,
    pub status: PartialResolvedImport,
}

impl ImportDirective {
    pub fn new(import: Import) -> Self {
        ImportDirective { import, status: PartialResolvedImport::Unresolved }
    }

    pub fn with_status(self, status: PartialResolvedImport) -> Self {
        ImportDirective { status, ..self }
    }
}
