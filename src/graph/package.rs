use crate::liveness::path_to_prefix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tree_sitter::Tree;

/// A parsed primary source file of a package
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Location on disk
    pub path: PathBuf,
    /// Machine-independent name used in the report: `<import path>/<file>`
    pub label: String,
    /// Original contents
    pub source: String,
    pub tree: Tree,
}

/// Module metadata as reported by `go list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ModuleInfo {
    pub path: String,
    pub version: String,
    pub main: bool,
    pub go_version: String,
}

impl fmt::Display for ModuleInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path={}", self.path)?;
        if !self.version.is_empty() {
            write!(f, " version={}", self.version)?;
        }
        write!(f, " main={}", self.main)?;
        if !self.go_version.is_empty() {
            write!(f, " go={}", self.go_version)?;
        }
        Ok(())
    }
}

/// One package of the import graph. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct PackageNode {
    /// Canonical import path
    pub path: String,
    /// Package clause name
    pub name: String,
    pub files: Vec<SourceFile>,
    /// Labels of non-Go files (C, assembly, headers, syso objects)
    pub other_files: Vec<String>,
    /// Resolved import paths of direct dependencies, in listing order
    pub imports: Vec<String>,
    pub module: Option<ModuleInfo>,
    pub standard: bool,
}

impl PackageNode {
    /// Prefix the linker gives this package's symbols
    pub fn symbol_prefix(&self) -> String {
        if self.name == "main" {
            "main".to_string()
        } else {
            path_to_prefix(&self.path)
        }
    }

    /// Qualified name of a package-level type or function
    pub fn symbol(&self, name: &str) -> String {
        format!("{}.{}", self.symbol_prefix(), name)
    }

    /// Qualified name of a method
    pub fn method_symbol(&self, receiver: &str, method: &str) -> String {
        format!("{}.{}.{}", self.symbol_prefix(), receiver, method)
    }
}

/// Label a file of package `path` the way the report shows it
pub fn file_label(path: &str, file_name: &str) -> String {
    format!("{}/{}", path, file_name)
}
