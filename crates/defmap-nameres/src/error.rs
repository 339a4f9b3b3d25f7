use defmap_item_tree::{CrateGraphError, CrateId};
use miette::Diagnostic;
use thiserror::Error;

use crate::per_ns::Namespace;

/// Failures that abort building one crate's map. No partial map is ever
/// published when one of these is returned.
#[derive(Debug, Error, Diagnostic)]
pub enum DefMapError {
    #[error("Glob import propagation in crate `{krate}` exceeded the recursion limit of {limit} at `{module}`")]
    #[diagnostic(
        code(defmap_nameres::glob_recursion_limit),
        help("Glob imports between modules are expected to settle; this indicates an internal inconsistency")
    )]
    GlobRecursionLimit { krate: String, module: String, limit: usize },

    #[error("Name resolution was cancelled")]
    #[diagnostic(code(defmap_nameres::cancelled))]
    Cancelled,

    #[error("Crate `{krate}` cannot be resolved before its dependency `{dependency}`")]
    #[diagnostic(
        code(defmap_nameres::dependency_not_built),
        help("Build definition maps in topological order of the crate graph")
    )]
    DependencyNotBuilt { krate: String, dependency: String },

    #[error("Unknown crate {0}")]
    #[diagnostic(code(defmap_nameres::unknown_crate))]
    UnknownCrate(CrateId),

    #[error(transparent)]
    #[diagnostic(transparent)]
    CrateGraph(#[from] CrateGraphError),
}

/// Problems recorded on a finished map. None of them stops resolution of
/// unrelated names.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum DefDiagnostic {
    #[error("Unresolved import `{path}` in `{module}`")]
    #[diagnostic(code(defmap_nameres::unresolved_import))]
    UnresolvedImport { module: String, path: String },

    #[error("`{name}` is imported more than once in the {namespace} namespace of `{module}`")]
    #[diagnostic(
        code(defmap_nameres::ambiguous_import),
        help("`{name}` keeps referring to `{existing}`; the import of `{rejected}` was ignored")
    )]
    AmbiguousImport {
        module: String,
        name: String,
        namespace: Namespace,
        existing: String,
        rejected: String,
    },

    #[error("`{name}` is defined more than once in the {namespace} namespace of `{module}`")]
    #[diagnostic(code(defmap_nameres::duplicate_definition))]
    DuplicateDefinition { module: String, name: String, namespace: Namespace },

    #[error("Skipped {what} without a name in `{module}`")]
    #[diagnostic(code(defmap_nameres::malformed_item), severity(Warning))]
    MalformedItem { module: String, what: String },

    #[error("Visibility path `{path}` of `{name}` in `{module}` does not name an ancestor module")]
    #[diagnostic(
        code(defmap_nameres::unresolved_visibility),
        severity(Warning),
        help("The item is treated as `pub`")
    )]
    UnresolvedVisibility { module: String, name: String, path: String },
}
