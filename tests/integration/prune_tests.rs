//! Pruning integration tests
//!
//! Packages are loaded from a hand-written `go list` stream over the fixture
//! sources, and pruned against a fixed liveness set, so no Go toolchain is
//! needed.

use liveprune::graph::SourceFile;
use liveprune::parser::GoParser;
use liveprune::{GraphLoader, LivenessSet, PackageGraph, PackageNode, PrunedFile, Pruner};
use serde_json::json;
use std::path::PathBuf;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_smallbin() -> PackageGraph {
    let listing = json!({
        "ImportPath": "example.com/smallbin",
        "Name": "main",
        "Dir": fixtures_path().join("smallbin"),
        "GoFiles": ["smallbin.go"],
        "Module": {"Path": "example.com/smallbin", "Main": true, "GoVersion": "1.21"}
    });
    GraphLoader::from_listing(listing.to_string().as_bytes()).expect("Failed to load smallbin")
}

/// Symbols the linker keeps for smallbin
fn smallbin_live() -> LivenessSet {
    LivenessSet::from_names([
        "main.main",
        "main.Foo",
        "main.FooType.ValueMethod",
        "main.FooType.PtrMethod",
        "main.UsedFactoredType",
    ])
}

fn prune_smallbin() -> PrunedFile {
    let graph = load_smallbin();
    let live = smallbin_live();
    let pkg = graph.package(graph.root());
    Pruner::new(&live)
        .prune_file(pkg, &pkg.files[0])
        .expect("Failed to prune smallbin")
}

const SMALLBIN_PRUNED: &str = r#"package main

// Comment for main.
//
// Last line.
func main() {
	Foo()

	var ft FooType
	ft.ValueMethod()
	ft.PtrMethod()

	var used any = UsedFactoredType(1)
	println(used != nil)
}

// Comment for Foo.
//
// Last line.
func Foo() {
	println("Foo")
}

type (
	// UsedFactoredType is used.
	UsedFactoredType int
)

// FooType is a used type.
type FooType struct {
	x int
}

func (FooType) ValueMethod() {}

func (*FooType) PtrMethod() {}
"#;

// ============================================================================
// Dead code removal
// ============================================================================

#[test]
fn test_smallbin_pruned_source() {
    let pruned = prune_smallbin();
    assert_eq!(pruned.source, SMALLBIN_PRUNED);
}

#[test]
fn test_dead_declarations_and_comments_are_gone() {
    let pruned = prune_smallbin();
    for gone in [
        "Bar",
        "UnusedType",
        "UnusedFactoredType",
        "// Unused.",
        "// foo",
        "Comment on a whole group",
        "Nothing in here anyway",
    ] {
        assert!(!pruned.source.contains(gone), "{gone:?} survived pruning");
    }
}

#[test]
fn test_deleted_symbols_in_source_order() {
    let pruned = prune_smallbin();
    assert_eq!(
        pruned.deleted,
        vec!["main.Bar", "main.UnusedType", "main.UnusedFactoredType"]
    );
}

// ============================================================================
// Live code preservation
// ============================================================================

#[test]
fn test_live_declarations_are_kept() {
    let pruned = prune_smallbin();
    for kept in [
        "func main()",
        "func Foo()",
        "type FooType struct",
        "func (FooType) ValueMethod() {}",
        "func (*FooType) PtrMethod() {}",
        "UsedFactoredType int",
        "// Comment for Foo.",
    ] {
        assert!(pruned.source.contains(kept), "{kept:?} was removed");
    }
}

#[test]
fn test_everything_live_is_a_no_op() {
    let graph = load_smallbin();
    let pkg = graph.package(graph.root());
    let live = LivenessSet::from_names([
        "main.main",
        "main.Foo",
        "main.Bar",
        "main.UnusedType",
        "main.UnusedFactoredType",
        "main.UsedFactoredType",
        "main.FooType.ValueMethod",
        "main.FooType.PtrMethod",
    ]);
    let pruned = Pruner::new(&live).prune_file(pkg, &pkg.files[0]).unwrap();

    // The empty group has no live member and goes regardless.
    assert_eq!(pruned.deleted, Vec::<String>::new());
    assert!(!pruned.source.contains("Comment on a whole group"));
    assert!(pruned.source.contains("func Bar()"));
}

// ============================================================================
// Group atomicity
// ============================================================================

#[test]
fn test_group_survives_with_a_live_member() {
    let pruned = prune_smallbin();
    assert!(pruned
        .source
        .contains("type (\n\t// UsedFactoredType is used.\n\tUsedFactoredType int\n)\n"));
}

#[test]
fn test_fully_dead_group_is_removed_with_its_doc() {
    let src = "package lib\n\n// Group doc.\ntype (\n\t// A doc.\n\tA int\n\tB string\n)\n\nfunc F() {}\n";
    let pruned = prune_source(src, &["example.com/lib.F"]);
    assert_eq!(pruned.source, "package lib\n\nfunc F() {}\n");
    assert_eq!(pruned.deleted, vec!["example.com/lib.A", "example.com/lib.B"]);
}

#[test]
fn test_dead_first_member_keeps_the_parens() {
    let src = "package lib\n\ntype (\n\tA int\n\tB int\n)\n";
    let pruned = prune_source(src, &["example.com/lib.B"]);
    assert_eq!(pruned.source, "package lib\n\ntype (\n\tB int\n)\n");
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_pruning_twice_changes_nothing() {
    let live = smallbin_live();
    let once = prune_smallbin();

    let pkg = package("main", "example.com/smallbin", &once.source);
    let twice = Pruner::new(&live).prune_file(&pkg, &pkg.files[0]).unwrap();

    assert_eq!(twice.source, once.source);
    assert!(twice.deleted.is_empty());
}

#[test]
fn test_prune_graph_covers_every_package() {
    let graph = load_smallbin();
    let live = smallbin_live();
    let pruned = Pruner::new(&live).prune_graph(&graph).unwrap();

    assert_eq!(pruned.len(), 1);
    assert_eq!(pruned["example.com/smallbin"][0].source, SMALLBIN_PRUNED);
}

// ============================================================================
// Helpers
// ============================================================================

fn package(name: &str, path: &str, src: &str) -> PackageNode {
    let tree = GoParser::new().unwrap().parse(src).unwrap();
    PackageNode {
        path: path.to_string(),
        name: name.to_string(),
        files: vec![SourceFile {
            path: PathBuf::from("input.go"),
            label: format!("{path}/input.go"),
            source: src.to_string(),
            tree,
        }],
        other_files: vec![],
        imports: vec![],
        module: None,
        standard: false,
    }
}

fn prune_source(src: &str, live: &[&str]) -> PrunedFile {
    let pkg = package("lib", "example.com/lib", src);
    let live = LivenessSet::from_names(live.iter().copied());
    Pruner::new(&live).prune_file(&pkg, &pkg.files[0]).unwrap()
}
