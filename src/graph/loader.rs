use super::package::{file_label, ModuleInfo, PackageNode, SourceFile};
use super::PackageGraph;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::parser::GoParser;
use crate::toolchain::GoToolchain;
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// One package object of the `go list -json` stream
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ListedPackage {
    import_path: String,
    name: String,
    dir: PathBuf,
    go_files: Vec<String>,
    cgo_files: Vec<String>,
    c_files: Vec<String>,
    #[serde(rename = "CXXFiles")]
    cxx_files: Vec<String>,
    m_files: Vec<String>,
    h_files: Vec<String>,
    f_files: Vec<String>,
    s_files: Vec<String>,
    swig_files: Vec<String>,
    #[serde(rename = "SwigCXXFiles")]
    swig_cxx_files: Vec<String>,
    syso_files: Vec<String>,
    imports: Vec<String>,
    import_map: HashMap<String, String>,
    module: Option<ModuleInfo>,
    error: Option<ListError>,
    deps_errors: Vec<ListError>,
    dep_only: bool,
    standard: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ListError {
    err: String,
}

impl ListedPackage {
    fn primary_files(&self) -> impl Iterator<Item = &String> {
        self.go_files.iter().chain(&self.cgo_files)
    }

    fn other_files(&self) -> impl Iterator<Item = &String> {
        self.c_files
            .iter()
            .chain(&self.cxx_files)
            .chain(&self.m_files)
            .chain(&self.h_files)
            .chain(&self.f_files)
            .chain(&self.s_files)
            .chain(&self.swig_files)
            .chain(&self.swig_cxx_files)
            .chain(&self.syso_files)
    }

    fn errors(&self) -> Vec<&str> {
        self.error
            .iter()
            .chain(&self.deps_errors)
            .map(|e| e.err.as_str())
            .collect()
    }
}

/// Loads the package graph of an entry point through `go list`
pub struct GraphLoader {
    toolchain: GoToolchain,
}

impl GraphLoader {
    pub fn new(config: &Config) -> Self {
        Self {
            toolchain: GoToolchain::new(config),
        }
    }

    pub fn load(&self, entry: &str) -> Result<PackageGraph> {
        info!("Loading packages of {}...", entry);
        let listing = self.toolchain.list_deps(entry)?;
        let graph = Self::from_listing(&listing)?;
        let standard = graph.packages().filter(|p| p.standard).count();
        info!("Loaded {} packages ({} from the standard library)", graph.len(), standard);
        Ok(graph)
    }

    /// Build the graph from a `go list -e -deps -json` stream, reading and
    /// parsing every primary source file.
    pub fn from_listing(listing: &[u8]) -> Result<PackageGraph> {
        let listed = serde_json::Deserializer::from_slice(listing)
            .into_iter::<ListedPackage>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Metadata(format!("malformed go list output: {}", e)))?;

        let failures: Vec<String> = listed
            .iter()
            .filter(|p| !p.errors().is_empty())
            .map(|p| format!("errors reading {:?}: {:?}", p.import_path, p.errors()))
            .collect();
        if !failures.is_empty() {
            return Err(Error::Metadata(failures.join("\n")));
        }

        let roots: Vec<&str> = listed
            .iter()
            .filter(|p| !p.dep_only)
            .map(|p| p.import_path.as_str())
            .collect();
        let root = match roots.as_slice() {
            [root] => root.to_string(),
            [] => return Err(Error::Metadata("no entry package in listing".to_string())),
            many => {
                return Err(Error::Metadata(format!(
                    "entry point matches {} packages: {:?}",
                    many.len(),
                    many
                )))
            }
        };

        let jobs: Vec<(usize, PathBuf, String)> = listed
            .iter()
            .enumerate()
            .flat_map(|(i, p)| {
                p.primary_files()
                    .map(move |f| (i, p.dir.join(f), file_label(&p.import_path, f)))
            })
            .collect();
        debug!("parsing {} files", jobs.len());

        let parsed: Vec<(usize, SourceFile)> = jobs
            .into_par_iter()
            .map_init(GoParser::new, |parser, (i, path, label)| -> Result<(usize, SourceFile)> {
                let parser = parser
                    .as_mut()
                    .map_err(|e| Error::Grammar(e.to_string()))?;
                let source = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
                let tree = parser.parse(&source)?;
                Ok((
                    i,
                    SourceFile {
                        path,
                        label,
                        source,
                        tree,
                    },
                ))
            })
            .collect::<Result<_>>()?;

        let mut files_by_package: Vec<Vec<SourceFile>> = listed.iter().map(|_| Vec::new()).collect();
        for (i, file) in parsed {
            files_by_package[i].push(file);
        }

        let packages = listed
            .into_iter()
            .zip(files_by_package)
            .map(|(p, files)| {
                let other_files = p
                    .other_files()
                    .map(|f| file_label(&p.import_path, f))
                    .collect();
                let imports = p
                    .imports
                    .iter()
                    .map(|i| p.import_map.get(i).unwrap_or(i).clone())
                    .collect();
                PackageNode {
                    path: p.import_path,
                    name: p.name,
                    files,
                    other_files,
                    imports,
                    module: p.module,
                    standard: p.standard,
                }
            })
            .collect();

        PackageGraph::from_packages(packages, &root)
    }
}
