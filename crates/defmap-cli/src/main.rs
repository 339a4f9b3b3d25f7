use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use defmap_item_tree::Edition;

mod commands;
mod error;

#[derive(Parser, Debug)]
#[command(name = "defmap")]
#[command(about = "Build and query crate-level definition maps", long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Resolve a crate graph and print the definition maps
    Dump {
        /// Crate graph description
        #[arg(value_name = "GRAPH")]
        graph: PathBuf,
        /// Only print this crate (its dependencies are still resolved)
        #[arg(long = "crate", value_name = "NAME")]
        krate: Option<String>,
        /// Edition for crates that do not declare one
        #[arg(long)]
        edition: Option<Edition>,
    },

    /// Resolve a path as seen from one module
    Resolve {
        /// Crate graph description
        #[arg(value_name = "GRAPH")]
        graph: PathBuf,
        /// Crate the path is written in
        #[arg(long = "crate", value_name = "NAME")]
        krate: String,
        /// Module the path is written in, relative to the crate root
        #[arg(long, value_name = "MODULE", default_value = "crate")]
        module: String,
        /// Resolve the path the way a `use` declaration would
        #[arg(short, long)]
        import: bool,
        /// Edition for crates that do not declare one
        #[arg(long)]
        edition: Option<Edition>,
        /// The path, e.g. `super::a::b`
        #[arg(value_name = "PATH")]
        path: String,
    },
}

fn main() -> miette::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new().filter_level(args.verbose.log_level_filter()).init();

    match args.command {
        Command::Dump { graph, krate, edition } => commands::dump::handle_dump(&graph, krate.as_deref(), edition)?,
        Command::Resolve { graph, krate, module, import, edition, path } => {
            commands::resolve::handle_resolve(&graph, &krate, &module, &path, import, edition)?
        }
    }
    Ok(())
}
