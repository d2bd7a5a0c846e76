//! The package import graph: an arena of packages indexed by import path.

mod loader;
mod package;

pub use loader::GraphLoader;
pub use package::{file_label, ModuleInfo, PackageNode, SourceFile};

use crate::error::{Error, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Packages reachable from one entry point. Edges point from importer to
/// imported package; the graph is acyclic.
#[derive(Debug)]
pub struct PackageGraph {
    inner: DiGraph<PackageNode, ()>,

    /// Map from import path to node index
    index: HashMap<String, NodeIndex>,

    root: NodeIndex,
}

impl PackageGraph {
    /// Assemble a graph from loaded packages. Every import must resolve to
    /// one of `packages` (the cgo pseudo-package `C` excepted).
    pub fn from_packages(packages: Vec<PackageNode>, root_path: &str) -> Result<Self> {
        let mut inner = DiGraph::with_capacity(packages.len(), 0);
        let mut index = HashMap::new();

        for pkg in packages {
            let path = pkg.path.clone();
            let idx = inner.add_node(pkg);
            if index.insert(path.clone(), idx).is_some() {
                return Err(Error::Metadata(format!("package {:?} listed twice", path)));
            }
        }

        let mut edges = Vec::new();
        for idx in inner.node_indices() {
            let pkg = &inner[idx];
            for import in &pkg.imports {
                if import == "C" {
                    continue;
                }
                let Some(&target) = index.get(import) else {
                    return Err(Error::Metadata(format!(
                        "{:?} imports {:?}, which was not loaded",
                        pkg.path, import
                    )));
                };
                edges.push((idx, target));
            }
        }
        for (from, to) in edges {
            inner.update_edge(from, to, ());
        }

        if let Err(cycle) = toposort(&inner, None) {
            return Err(Error::ImportCycle(inner[cycle.node_id()].path.clone()));
        }

        let root = *index
            .get(root_path)
            .ok_or_else(|| Error::Metadata(format!("entry package {:?} not loaded", root_path)))?;

        Ok(Self { inner, index, root })
    }

    /// The entry package
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn package(&self, idx: NodeIndex) -> &PackageNode {
        &self.inner[idx]
    }

    /// Find a package by import path
    pub fn get(&self, path: &str) -> Option<&PackageNode> {
        self.index.get(path).map(|&idx| &self.inner[idx])
    }

    /// Direct dependencies of a package, sorted by import path
    pub fn sorted_imports(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut imports: Vec<NodeIndex> = self.inner.neighbors(idx).collect();
        imports.sort_by(|a, b| self.inner[*a].path.cmp(&self.inner[*b].path));
        imports
    }

    /// All packages in arena order
    pub fn packages(&self) -> impl Iterator<Item = &PackageNode> {
        self.inner.node_weights()
    }

    pub fn len(&self) -> usize {
        self.inner.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Get the underlying petgraph for traversals
    pub fn inner(&self) -> &DiGraph<PackageNode, ()> {
        &self.inner
    }
}
