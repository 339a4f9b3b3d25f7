use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while loading or ordering a crate graph.
#[derive(Debug, Error, Diagnostic)]
pub enum CrateGraphError {
    #[error("Failed to read crate graph file {path}")]
    #[diagnostic(code(defmap_item_tree::io_error))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid crate graph description: {0}")]
    #[diagnostic(
        code(defmap_item_tree::toml_error),
        help("Check the `[[crate]]` tables and their `root` item trees")
    )]
    Toml(#[from] toml::de::Error),

    #[error("Crate `{krate}` depends on unknown crate `{dependency}`")]
    #[diagnostic(code(defmap_item_tree::unknown_dependency))]
    UnknownDependency { krate: String, dependency: String },

    #[error("Crate `{0}` is declared more than once")]
    #[diagnostic(code(defmap_item_tree::duplicate_crate))]
    DuplicateCrate(String),

    #[error("Dependency cycle detected involving crate `{0}`")]
    #[diagnostic(
        code(defmap_item_tree::dependency_cycle),
        help("Crate dependencies must form a directed acyclic graph")
    )]
    DependencyCycle(String),

    #[error("Invalid visibility `{0}`")]
    #[diagnostic(
        code(defmap_item_tree::invalid_visibility),
        help("Expected one of `pub`, `pub(crate)`, `pub(super)`, `pub(self)`, `pub(in path)` or nothing")
    )]
    InvalidVisibility(String),
}
