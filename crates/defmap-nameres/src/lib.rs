#![doc = include_str!("../README.md")]

mod collector;
pub mod config;
pub mod db;
pub mod def_map;
pub mod error;
pub mod import;
pub mod path;
pub mod path_resolution;
pub mod per_ns;
mod tree_builder;
pub mod visibility;

pub use config::ResolveConfig;
pub use db::{build_def_map, Cancellation, DefDatabase};
pub use def_map::{DefMap, LocalModuleId, ModuleData, ModuleId, ModuleKind};
pub use error::{DefDiagnostic, DefMapError};
pub use import::{Import, ImportDirective, ImportKind, PartialResolvedImport};
pub use path::{ModPath, Name, Path, PathKind};
pub use path_resolution::{ResolveMode, ResolvePathResult};
pub use per_ns::{Namespace, PerNs, VisItem};
pub use visibility::Visibility;
