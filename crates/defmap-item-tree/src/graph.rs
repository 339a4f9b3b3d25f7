//! The crate graph: every crate's item tree together with its dependency
//! edges, as the build system describes it.

use std::fmt;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::CrateGraphError;
use crate::items::ModuleItems;

/// Index of a crate inside its `CrateGraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrateId(pub u32);

impl CrateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CrateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crate#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Edition {
    #[serde(rename = "2015")]
    Edition2015,
    #[serde(rename = "2018")]
    Edition2018,
    #[default]
    #[serde(rename = "2021")]
    Edition2021,
}

impl Edition {
    /// The 2018 path changes: `::a` names an extern crate and plain import
    /// paths are resolved lexically.
    pub fn has_uniform_paths(self) -> bool {
        self >= Edition::Edition2018
    }
}

impl std::str::FromStr for Edition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2015" => Ok(Edition::Edition2015),
            "2018" => Ok(Edition::Edition2018),
            "2021" => Ok(Edition::Edition2021),
            other => Err(format!("unknown edition `{other}`")),
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Edition::Edition2015 => "2015",
            Edition::Edition2018 => "2018",
            Edition::Edition2021 => "2021",
        })
    }
}

/// One crate of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrateData {
    pub name: String,
    /// Overrides the configured default edition.
    #[serde(default)]
    pub edition: Option<Edition>,
    #[serde(default)]
    pub root: ModuleItems,
    /// Names of direct dependencies, as declared in the graph.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl CrateData {
    pub fn new(name: &str, root: ModuleItems) -> Self {
        Self { name: name.to_string(), edition: None, root, dependencies: Vec::new() }
    }

    pub fn edition(mut self, edition: Edition) -> Self {
        self.edition = Some(edition);
        self
    }

    pub fn dependency(mut self, name: &str) -> Self {
        self.dependencies.push(name.to_string());
        self
    }

    /// The name under which dependents see this crate in their extern
    /// prelude: `my-crate` becomes `my_crate`.
    pub fn normalized_name(&self) -> String {
        normalize_crate_name(&self.name)
    }
}

pub fn normalize_crate_name(name: &str) -> String {
    name.replace('-', "_")
}

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default, rename = "crate")]
    crates: Vec<CrateData>,
}

/// All crates of a build, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct CrateGraph {
    crates: Vec<CrateData>,
    by_name: FxHashMap<String, CrateId>,
}

impl CrateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_crate(&mut self, data: CrateData) -> Result<CrateId, CrateGraphError> {
        if self.by_name.contains_key(&data.name) {
            return Err(CrateGraphError::DuplicateCrate(data.name));
        }
        let id = CrateId(self.crates.len() as u32);
        self.by_name.insert(data.name.clone(), id);
        self.crates.push(data);
        Ok(id)
    }

    pub fn crate_data(&self, id: CrateId) -> Option<&CrateData> {
        self.crates.get(id.index())
    }

    pub fn crate_by_name(&self, name: &str) -> Option<CrateId> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CrateId, &CrateData)> {
        self.crates.iter().enumerate().map(|(idx, data)| (CrateId(idx as u32), data))
    }

    pub fn len(&self) -> usize {
        self.crates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crates.is_empty()
    }

    /// Direct dependencies of `id`, resolved to crate ids.
    pub fn dependencies(&self, id: CrateId) -> Result<Vec<CrateId>, CrateGraphError> {
        let Some(data) = self.crate_data(id) else {
            return Ok(Vec::new());
        };
        data.dependencies
            .iter()
            .map(|dep| {
                self.crate_by_name(dep).ok_or_else(|| CrateGraphError::UnknownDependency {
                    krate: data.name.clone(),
                    dependency: dep.clone(),
                })
            })
            .collect()
    }

    /// Every crate reachable from `id` through dependency edges, `id` excluded.
    pub fn transitive_dependencies(&self, id: CrateId) -> Result<Vec<CrateId>, CrateGraphError> {
        let mut seen = vec![false; self.crates.len()];
        let mut stack = self.dependencies(id)?;
        let mut out = Vec::new();
        while let Some(dep) = stack.pop() {
            if dep == id {
                return Err(CrateGraphError::DependencyCycle(self.crates[id.index()].name.clone()));
            }
            if std::mem::replace(&mut seen[dep.index()], true) {
                continue;
            }
            out.push(dep);
            stack.extend(self.dependencies(dep)?);
        }
        out.sort();
        Ok(out)
    }

    /// Orders crates so that every crate comes after all of its dependencies.
    pub fn topological_order(&self) -> Result<Vec<CrateId>, CrateGraphError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        fn visit(
            graph: &CrateGraph,
            id: CrateId,
            marks: &mut [Mark],
            order: &mut Vec<CrateId>,
        ) -> Result<(), CrateGraphError> {
            match marks[id.index()] {
                Mark::Done => return Ok(()),
                Mark::InProgress => {
                    return Err(CrateGraphError::DependencyCycle(graph.crates[id.index()].name.clone()))
                }
                Mark::Unvisited => {}
            }
            marks[id.index()] = Mark::InProgress;
            for dep in graph.dependencies(id)? {
                visit(graph, dep, marks, order)?;
            }
            marks[id.index()] = Mark::Done;
            order.push(id);
            Ok(())
        }

        let mut marks = vec![Mark::Unvisited; self.crates.len()];
        let mut order = Vec::with_capacity(self.crates.len());
        for (id, _) in self.iter() {
            visit(self, id, &mut marks, &mut order)?;
        }
        Ok(order)
    }

    /// Parses a graph file. Unknown top-level tables (such as `[config]`)
    /// are left for other readers.
    pub fn from_toml_str(text: &str) -> Result<Self, CrateGraphError> {
        let file: GraphFile = toml::from_str(text)?;
        let mut graph = CrateGraph::new();
        for data in file.crates {
            graph.add_crate(data)?;
        }
        log::debug!("loaded crate graph with {} crate(s)", graph.len());
        Ok(graph)
    }

    pub fn from_path(path: &Path) -> Result<Self, CrateGraphError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| CrateGraphError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &[&str])]) -> CrateGraph {
        let mut graph = CrateGraph::new();
        for (name, deps) in edges {
            let mut data = CrateData::new(name, ModuleItems::new());
            for dep in *deps {
                data = data.dependency(dep);
            }
            graph.add_crate(data).unwrap();
        }
        graph
    }

    #[test]
    fn topological_order_puts_dependencies_first() {
        let graph = graph(&[("app", &["serde", "log"]), ("serde", &["core"]), ("log", &["core"]), ("core", &[])]);
        let order: Vec<_> = graph
            .topological_order()
            .unwrap()
            .into_iter()
            .map(|id| graph.crate_data(id).unwrap().name.as_str())
            .collect();
        assert_eq!(order, vec!["core", "serde", "log", "app"]);
    }

    #[test]
    fn cycles_are_rejected() {
        let graph = graph(&[("a", &["b"]), ("b", &["a"])]);
        assert!(matches!(graph.topological_order(), Err(CrateGraphError::DependencyCycle(_))));
    }

    #[test]
    fn unknown_dependency_is_reported() {
        let graph = graph(&[("a", &["missing"])]);
        assert!(matches!(
            graph.topological_order(),
            Err(CrateGraphError::UnknownDependency { dependency, .. }) if dependency == "missing"
        ));
    }

    #[test]
    fn transitive_dependencies_are_collected() {
        let graph = graph(&[("app", &["mid"]), ("mid", &["core"]), ("core", &[])]);
        let app = graph.crate_by_name("app").unwrap();
        let deps = graph.transitive_dependencies(app).unwrap();
        assert_eq!(deps, vec![graph.crate_by_name("mid").unwrap(), graph.crate_by_name("core").unwrap()]);
    }

    #[test]
    fn duplicate_crate_names_are_rejected() {
        let mut graph = CrateGraph::new();
        graph.add_crate(CrateData::new("a", ModuleItems::new())).unwrap();
        assert!(graph.add_crate(CrateData::new("a", ModuleItems::new())).is_err());
    }

    #[test]
    fn normalizes_dashes() {
        assert_eq!(CrateData::new("my-crate", ModuleItems::new()).normalized_name(), "my_crate");
    }

    #[test]
    fn loads_graph_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.toml");
        std::fs::write(
            &path,
            r#"
                [config]
                edition = "2018"

                [[crate]]
                name = "dep"
                root = { items = [{ name = "f", kind = "function", visibility = "pub" }] }

                [[crate]]
                name = "app"
                edition = "2015"
                dependencies = ["dep"]
            "#,
        )
        .unwrap();

        let graph = CrateGraph::from_path(&path).unwrap();
        let app = graph.crate_by_name("app").unwrap();
        assert_eq!(graph.crate_data(app).unwrap().edition, Some(Edition::Edition2015));
        assert_eq!(graph.dependencies(app).unwrap(), vec![graph.crate_by_name("dep").unwrap()]);
        let dep = graph.crate_data(graph.crate_by_name("dep").unwrap()).unwrap();
        assert_eq!(dep.root.items.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CrateGraph::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, CrateGraphError::Io { .. }));
    }
}
