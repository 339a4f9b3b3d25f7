#![allow(dead_code)]

use defmap_item_tree::{CrateData, CrateGraph, Edition, ModuleItems};
use defmap_nameres::{DefDatabase, DefMap, ResolveConfig};
use expect_test::Expect;
use triomphe::Arc;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Resolves a single crate named `test`.
pub fn crate_def_map(root: ModuleItems) -> Arc<DefMap> {
    crate_def_map_with_edition(root, Edition::Edition2021)
}

pub fn crate_def_map_with_edition(root: ModuleItems, edition: Edition) -> Arc<DefMap> {
    init_logger();
    let mut graph = CrateGraph::new();
    let krate = graph.add_crate(CrateData::new("test", root).edition(edition)).unwrap();
    let mut db = DefDatabase::new(graph, ResolveConfig::default());
    db.build_crate(krate).unwrap()
}

/// Builds every crate of `crates` in dependency order and returns the map
/// of the one named `name`.
pub fn graph_def_map(crates: Vec<CrateData>, config: ResolveConfig, name: &str) -> Arc<DefMap> {
    init_logger();
    let mut graph = CrateGraph::new();
    for data in crates {
        graph.add_crate(data).unwrap();
    }
    let mut db = DefDatabase::new(graph, config);
    db.build_all().unwrap();
    db.crate_def_map_by_name(name).unwrap()
}

pub fn check(root: ModuleItems, expect: Expect) {
    expect.assert_eq(&crate_def_map(root).dump());
}
