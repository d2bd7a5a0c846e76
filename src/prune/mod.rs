//! Declaration pruner: removes top-level types, functions and methods whose
//! symbols did not survive linking.
//!
//! Deletions are computed as byte ranges over the original file and applied
//! in one batch. Nodes are never removed from the syntax tree, so comments
//! inside a deleted declaration cannot leak to the top level of the file.

mod editor;
mod ranges;

pub use editor::{DeletionRange, EditBuffer};
pub use ranges::{declaration_range, doc_start, trailing_end, widen};

use crate::error::Result;
use crate::graph::{PackageGraph, PackageNode, SourceFile};
use crate::liveness::LivenessSet;
use crate::parser::{children, declared_name, receiver_type_name};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;
use tree_sitter::Node;

/// A file after pruning, before formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunedFile {
    pub label: String,
    pub source: String,
    /// Symbols whose declarations were removed, in source order
    pub deleted: Vec<String>,
}

/// Pruned files of every package, keyed by import path
pub type PrunedGraph = HashMap<String, Vec<PrunedFile>>;

/// Prunes package sources against a liveness set
pub struct Pruner<'a> {
    live: &'a LivenessSet,
}

impl<'a> Pruner<'a> {
    pub fn new(live: &'a LivenessSet) -> Self {
        Self { live }
    }

    /// Prune every package of the graph. Packages share no state, so they
    /// are processed in parallel.
    pub fn prune_graph(&self, graph: &PackageGraph) -> Result<PrunedGraph> {
        let packages: Vec<&PackageNode> = graph.packages().collect();
        packages
            .into_par_iter()
            .map(|pkg| Ok((pkg.path.clone(), self.prune_package(pkg)?)))
            .collect()
    }

    /// Prune the files of one package, keeping load order
    pub fn prune_package(&self, pkg: &PackageNode) -> Result<Vec<PrunedFile>> {
        pkg.files
            .iter()
            .map(|file| self.prune_file(pkg, file))
            .collect()
    }

    pub fn prune_file(&self, pkg: &PackageNode, file: &SourceFile) -> Result<PrunedFile> {
        let mut edits = EditBuffer::new(&file.source);
        let mut deleted = Vec::new();

        let top_level = children(file.tree.root_node());
        for (i, node) in top_level.iter().enumerate() {
            match node.kind() {
                "function_declaration" | "method_declaration" => {
                    let Some(symbol) = function_symbol(pkg, *node, &file.source) else {
                        continue;
                    };
                    if self.dead(&symbol) {
                        // The body goes with the declaration; it is never inspected.
                        edits.delete(declaration_range(&file.source, &top_level, i));
                        deleted.push(symbol);
                    }
                }
                "type_declaration" => {
                    self.prune_type_group(pkg, &file.source, &top_level, i, &mut edits, &mut deleted);
                }
                _ => {}
            }
        }

        let source = if edits.is_empty() {
            file.source.clone()
        } else {
            edits.apply(&file.label)?
        };

        Ok(PrunedFile {
            label: file.label.clone(),
            source,
            deleted,
        })
    }

    /// A type declaration is a group of one or more specs. Dead specs are
    /// removed individually unless every spec is dead, in which case the
    /// whole group goes, its own doc comment included.
    fn prune_type_group(
        &self,
        pkg: &PackageNode,
        source: &str,
        top_level: &[Node<'_>],
        i: usize,
        edits: &mut EditBuffer<'_>,
        deleted: &mut Vec<String>,
    ) {
        let members = children(top_level[i]);
        let mut specs = 0;
        let mut dead = Vec::new();

        for (j, member) in members.iter().enumerate() {
            if !matches!(member.kind(), "type_spec" | "type_alias") {
                continue;
            }
            specs += 1;
            let Some(name) = declared_name(*member, source) else {
                continue;
            };
            let symbol = pkg.symbol(name);
            if self.dead(&symbol) {
                dead.push((j, symbol));
            }
        }

        if dead.len() == specs {
            edits.delete(declaration_range(source, top_level, i));
        } else {
            for (j, _) in &dead {
                edits.delete(declaration_range(source, &members, *j));
            }
        }
        deleted.extend(dead.into_iter().map(|(_, symbol)| symbol));
    }

    fn dead(&self, symbol: &str) -> bool {
        if self.live.contains(symbol) {
            return false;
        }
        debug!("DEAD: {:?}", symbol);
        true
    }
}

/// Symbol of a function or method declaration
fn function_symbol(pkg: &PackageNode, node: Node<'_>, source: &str) -> Option<String> {
    let name = declared_name(node, source)?;
    if node.kind() == "method_declaration" {
        let receiver = receiver_type_name(node, source)?;
        Some(pkg.method_symbol(receiver, name))
    } else {
        Some(pkg.symbol(name))
    }
}
