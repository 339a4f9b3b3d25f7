//! Item-tree input model for the `defmap` name resolver.
//!
//! Parsing source text is someone else's job. This crate only describes what
//! the resolver consumes: per crate, a tree of modules with their named
//! declarations, flattened `use` leaves and `extern crate` declarations, plus
//! the dependency edges between crates. Everything is plain data that can be
//! built programmatically or loaded from a TOML description.

pub mod error;
pub mod graph;
pub mod items;
pub mod visibility;

pub use error::CrateGraphError;
pub use graph::{normalize_crate_name, CrateData, CrateGraph, CrateId, Edition};
pub use items::{
    ExternCrateItem, FieldShape, Item, ItemKind, ModuleItems, NamespaceShape, UseItem, Variant,
};
pub use visibility::RawVisibility;
