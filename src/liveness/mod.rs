//! Liveness oracle: which declarations survive compilation and linking.
//!
//! The entry point is built without optimisation or inlining, so every
//! function that is logically called keeps its own text symbol, and the
//! executable's symbol table is read back with `go tool nm`.

mod symbols;

pub use symbols::{
    normalize, path_to_prefix, split_package, RawSymbol, SymbolAction, SymbolFilter, SymbolRule,
    RULES,
};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::toolchain::GoToolchain;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::BufRead;
use tracing::{debug, info};

/// Set of symbol names reachable from the entry point.
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LivenessSet {
    names: BTreeSet<String>,
}

impl LivenessSet {
    /// Build from already-classified declaration names
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for name in names {
            set.insert(name.into());
        }
        set
    }

    /// Build from `go tool nm` output
    pub fn from_symbol_table(reader: impl BufRead, filter: &SymbolFilter) -> Result<Self> {
        let mut set = Self::default();
        for line in reader.lines() {
            let line = line.map_err(|e| Error::SymbolDump(format!("reading symbols: {}", e)))?;
            let Some(sym) = RawSymbol::parse(&line) else {
                continue;
            };
            if let Some(name) = filter.classify(sym.name) {
                set.insert(name);
            }
        }
        Ok(set)
    }

    /// Insert a declaration name. `pkg.A.B` also marks `pkg.A` live: a type
    /// with a linked method is linked, and `pkg.init.0` stands for `pkg.init`.
    fn insert(&mut self, name: String) {
        if let Some((pkg, rest)) = split_package(&name) {
            if let Some((outer, _)) = rest.split_once('.') {
                let outer = format!("{}.{}", pkg, outer);
                self.names.insert(outer);
            }
        }
        self.names.insert(name);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Builds the entry point and extracts its linked symbols
pub struct LivenessOracle {
    toolchain: GoToolchain,
    filter: SymbolFilter,
}

impl LivenessOracle {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            toolchain: GoToolchain::new(config),
            filter: SymbolFilter::new(config.deny_patterns()?),
        })
    }

    /// Compute the liveness set for `entry`.
    ///
    /// The executable lives in a scratch directory that is removed when this
    /// function returns, on success and on every error path.
    pub fn compute(&self, entry: &str) -> Result<LivenessSet> {
        let scratch = tempfile::Builder::new()
            .prefix("liveprune-")
            .tempdir()
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;
        let binary = scratch.path().join("entry.exe");

        info!("Building {} without optimisation...", entry);
        self.toolchain.build(entry, &binary)?;

        let set = self
            .toolchain
            .nm(&binary, |symbols| LivenessSet::from_symbol_table(symbols, &self.filter))?;

        info!("Liveness: {} linked symbols", set.len());
        debug!("live symbols: {:?}", set.names);
        Ok(set)
    }
}
