//! Text report of a pruned package graph.
//!
//! Packages are emitted depth-first from the entry point, each exactly once,
//! with direct imports visited in import-path order. Given the same graph and
//! liveness set the output is byte-identical across runs.

mod check;

pub use check::{compare, Mismatch};

use crate::format::SourceFormatter;
use crate::graph::{PackageGraph, PackageNode};
use crate::prune::{PrunedFile, PrunedGraph};
use petgraph::graph::NodeIndex;
use petgraph::visit::{VisitMap, Visitable};
use rayon::prelude::*;
use std::fmt::Write;
use tracing::warn;

/// Counters for the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub packages: usize,
    pub files: usize,
    pub deleted: usize,
    pub format_fallbacks: usize,
}

/// A rendered report
#[derive(Debug, Clone)]
pub struct Report {
    pub text: String,
    pub stats: RenderStats,
}

/// Renders pruned packages into the report format
pub struct Renderer<'a> {
    formatter: &'a dyn SourceFormatter,
}

impl<'a> Renderer<'a> {
    pub fn new(formatter: &'a dyn SourceFormatter) -> Self {
        Self { formatter }
    }

    pub fn render(&self, graph: &PackageGraph, pruned: &PrunedGraph) -> Report {
        let order = emission_order(graph);

        // Formatting is the slow part and has no ordering constraints;
        // only the write-out below must follow `order`.
        let formatted: Vec<Vec<(String, bool)>> = order
            .par_iter()
            .map(|&idx| {
                files_of(graph.package(idx), pruned)
                    .iter()
                    .map(|file| self.format_file(file))
                    .collect()
            })
            .collect();

        let mut text = String::new();
        let mut stats = RenderStats::default();
        for (&idx, sources) in order.iter().zip(formatted) {
            let pkg = graph.package(idx);
            let files = files_of(pkg, pruned);
            write_header(&mut text, graph, idx);

            for (file, (source, fell_back)) in files.iter().zip(sources) {
                let _ = write!(text, "// Source of {}:\n\n{}\n", file.label, source);
                stats.files += 1;
                stats.deleted += file.deleted.len();
                stats.format_fallbacks += usize::from(fell_back);
            }
            stats.packages += 1;
        }

        Report { text, stats }
    }

    /// Formatted source, or the unformatted pruned buffer when the formatter
    /// fails. The flag reports the fallback.
    fn format_file(&self, file: &PrunedFile) -> (String, bool) {
        match self.formatter.format(&file.source) {
            Ok(formatted) => (formatted, false),
            Err(e) => {
                warn!("Formatting {} failed, emitting it unformatted: {}", file.label, e);
                (file.source.clone(), true)
            }
        }
    }
}

/// Packages in report order: depth-first preorder from the entry point,
/// imports sorted by path, every package on first visit only.
pub fn emission_order(graph: &PackageGraph) -> Vec<NodeIndex> {
    let mut emitted = graph.inner().visit_map();
    let mut order = Vec::with_capacity(graph.len());
    let mut stack = vec![graph.root()];

    while let Some(idx) = stack.pop() {
        if !emitted.visit(idx) {
            continue;
        }
        order.push(idx);
        stack.extend(graph.sorted_imports(idx).into_iter().rev());
    }

    order
}

fn files_of<'p>(pkg: &PackageNode, pruned: &'p PrunedGraph) -> &'p [PrunedFile] {
    pruned.get(&pkg.path).map(Vec::as_slice).unwrap_or(&[])
}

fn write_header(text: &mut String, graph: &PackageGraph, idx: NodeIndex) {
    let pkg = graph.package(idx);

    let _ = writeln!(text, "\n### PACKAGE {}", pkg.path);
    for file in &pkg.files {
        let _ = writeln!(text, "file.go {:?}", file.label);
    }
    for label in &pkg.other_files {
        let _ = writeln!(text, "file.other {:?}", label);
    }
    for imported in graph.sorted_imports(idx) {
        let _ = writeln!(text, "import {:?} => {:?}", pkg.path, graph.package(imported).path);
    }
    let _ = writeln!(text, "Syntax: {}", pkg.files.len());
    match &pkg.module {
        Some(module) => {
            let _ = writeln!(text, "Module: {}", module);
        }
        None => text.push_str("Module: none\n"),
    }
}
