use defmap_item_tree::CrateGraphError;
use defmap_nameres::DefMapError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] CrateGraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] DefMapError),

    #[error("No crate named `{name}` in the graph")]
    #[diagnostic(code(defmap::cli::unknown_crate), help("Known crates: {known}"))]
    UnknownCrate { name: String, known: String },

    #[error("No module `{module}` in crate `{krate}`")]
    #[diagnostic(code(defmap::cli::unknown_module), help("Module paths are written from the crate root, e.g. `a::b`"))]
    UnknownModule { krate: String, module: String },

    #[error("Cannot parse path `{0}`")]
    #[diagnostic(code(defmap::cli::invalid_path))]
    InvalidPath(String),
}
