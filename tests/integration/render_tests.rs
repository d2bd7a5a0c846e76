//! Report rendering integration tests
//!
//! A four-package diamond (app imports left and right, both import shared)
//! is loaded from a hand-written `go list` stream and rendered without a
//! formatter process.

use liveprune::error::FormatError;
use liveprune::report::{emission_order, Renderer};
use liveprune::{GraphLoader, LivenessSet, PackageGraph, Passthrough, Pruner, SourceFormatter};
use serde_json::{json, Value};
use std::path::PathBuf;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/diamond")
}

fn module() -> Value {
    json!({"Path": "example.com/diamond", "Main": true, "GoVersion": "1.21"})
}

/// Dependencies first, entry point last, the way `go list -deps` orders them
fn load_diamond() -> PackageGraph {
    let dir = fixtures_path();
    let packages = [
        json!({
            "ImportPath": "example.com/diamond/shared",
            "Name": "shared",
            "Dir": dir.join("shared"),
            "GoFiles": ["shared.go"],
            "Module": module(),
            "DepOnly": true
        }),
        json!({
            "ImportPath": "example.com/diamond/left",
            "Name": "left",
            "Dir": dir.join("left"),
            "GoFiles": ["left.go"],
            "Imports": ["example.com/diamond/shared"],
            "Module": module(),
            "DepOnly": true
        }),
        json!({
            "ImportPath": "example.com/diamond/right",
            "Name": "right",
            "Dir": dir.join("right"),
            "GoFiles": ["right.go"],
            "SFiles": ["right_amd64.s"],
            "Imports": ["example.com/diamond/shared"],
            "Module": module(),
            "DepOnly": true
        }),
        json!({
            "ImportPath": "example.com/diamond/app",
            "Name": "main",
            "Dir": dir.join("app"),
            "GoFiles": ["main.go"],
            "Imports": ["example.com/diamond/right", "example.com/diamond/left"],
            "Module": module()
        }),
    ];
    let listing: Vec<String> = packages.iter().map(Value::to_string).collect();
    GraphLoader::from_listing(listing.join("\n").as_bytes()).expect("Failed to load diamond")
}

fn live() -> LivenessSet {
    LivenessSet::from_names([
        "main.main",
        "example.com/diamond/left.Run",
        "example.com/diamond/right.Run",
        "example.com/diamond/shared.Helper",
    ])
}

fn render_with(formatter: &dyn SourceFormatter) -> String {
    let graph = load_diamond();
    let live = live();
    let pruned = Pruner::new(&live).prune_graph(&graph).unwrap();
    Renderer::new(formatter).render(&graph, &pruned).text
}

fn render() -> String {
    render_with(&Passthrough)
}

fn package_headers(report: &str) -> Vec<&str> {
    report
        .lines()
        .filter_map(|l| l.strip_prefix("### PACKAGE "))
        .collect()
}

// ============================================================================
// Ordering and determinism
// ============================================================================

#[test]
fn test_depth_first_in_import_path_order() {
    let report = render();
    assert_eq!(
        package_headers(&report),
        vec![
            "example.com/diamond/app",
            "example.com/diamond/left",
            "example.com/diamond/shared",
            "example.com/diamond/right",
        ]
    );
}

#[test]
fn test_emission_order_visits_each_package_once() {
    let graph = load_diamond();
    let order = emission_order(&graph);
    assert_eq!(order.len(), graph.len());
    assert_eq!(order[0], graph.root());
}

#[test]
fn test_rendering_is_deterministic() {
    assert_eq!(render(), render());
}

#[test]
fn test_import_lines_are_sorted() {
    let report = render();
    let imports: Vec<&str> = report
        .lines()
        .filter(|l| l.starts_with("import \"example.com/diamond/app\""))
        .collect();
    assert_eq!(
        imports,
        vec![
            r#"import "example.com/diamond/app" => "example.com/diamond/left""#,
            r#"import "example.com/diamond/app" => "example.com/diamond/right""#,
        ]
    );
}

// ============================================================================
// Package sections
// ============================================================================

#[test]
fn test_package_section_layout() {
    let report = render();
    let expected = "\n### PACKAGE example.com/diamond/left\n\
        file.go \"example.com/diamond/left/left.go\"\n\
        import \"example.com/diamond/left\" => \"example.com/diamond/shared\"\n\
        Syntax: 1\n\
        Module: path=example.com/diamond main=true go=1.21\n\
        // Source of example.com/diamond/left/left.go:\n\n\
        package left\n\n\
        import \"example.com/diamond/shared\"\n\n\
        // Run is called from main.\n\
        func Run() {\n\
        \tshared.Helper()\n\
        }\n\n\n";
    assert!(report.contains(expected), "report was:\n{report}");
}

#[test]
fn test_other_files_are_listed() {
    let report = render();
    assert!(report.contains("file.other \"example.com/diamond/right/right_amd64.s\"\n"));
}

#[test]
fn test_dead_code_is_not_rendered() {
    let report = render();
    assert!(!report.contains("Spare"));
    assert!(!report.contains("type Config"));
    assert!(report.contains("// Helper is shared by left and right."));
}

#[test]
fn test_report_starts_with_root_section() {
    let report = render();
    assert!(report.starts_with("\n### PACKAGE example.com/diamond/app\n"));
}

// ============================================================================
// Formatting
// ============================================================================

struct Marking;

impl SourceFormatter for Marking {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        Ok(format!("// formatted\n{source}"))
    }
}

struct Failing;

impl SourceFormatter for Failing {
    fn format(&self, _source: &str) -> Result<String, FormatError> {
        Err(FormatError::Rejected("syntax error".to_string()))
    }
}

#[test]
fn test_formatter_output_is_emitted() {
    let report = render_with(&Marking);
    assert_eq!(report.matches("// formatted\n").count(), 4);
}

#[test]
fn test_formatter_failure_falls_back_to_pruned_source() {
    let graph = load_diamond();
    let live = live();
    let pruned = Pruner::new(&live).prune_graph(&graph).unwrap();

    let report = Renderer::new(&Failing).render(&graph, &pruned);
    assert_eq!(report.stats.format_fallbacks, 4);
    assert_eq!(report.text, render());
}

#[test]
fn test_render_stats() {
    let graph = load_diamond();
    let live = live();
    let pruned = Pruner::new(&live).prune_graph(&graph).unwrap();

    let stats = Renderer::new(&Passthrough).render(&graph, &pruned).stats;
    assert_eq!(stats.packages, 4);
    assert_eq!(stats.files, 4);
    // left.Spare and shared.Config
    assert_eq!(stats.deleted, 2);
    assert_eq!(stats.format_fallbacks, 0);
}
