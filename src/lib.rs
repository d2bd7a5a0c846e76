//! liveprune - Link-time dead code pruning for Go programs
//!
//! Given a Go entry point, this library shows the source of every package the
//! entry point depends on with the declarations that the linker discarded
//! removed.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **Graph Loading** - `go list` metadata and parsed syntax of every package
//! 2. **Liveness** - build without optimisation, collect linked symbols via `go tool nm`
//! 3. **Pruning** - delete dead top-level types, functions and methods
//! 4. **Rendering** - a deterministic text report of the pruned packages
//!
//! Loading and liveness are independent and run concurrently.

pub mod config;
pub mod error;
pub mod format;
pub mod graph;
pub mod liveness;
pub mod parser;
pub mod prune;
pub mod report;
pub mod toolchain;

pub use config::Config;
pub use error::{Error, Result};
pub use format::{Gofmt, Passthrough, SourceFormatter};
pub use graph::{GraphLoader, PackageGraph, PackageNode};
pub use liveness::{LivenessOracle, LivenessSet};
pub use prune::{PrunedFile, PrunedGraph, Pruner};
pub use report::{Renderer, Report};

use std::time::Instant;
use tracing::info;

/// Everything a run produced
#[derive(Debug)]
pub struct RunOutput {
    pub report: Report,
    pub live: LivenessSet,
}

/// Run the whole pipeline for one entry point
pub fn run(config: &Config, entry: &str) -> Result<RunOutput> {
    let start_time = Instant::now();
    let loader = GraphLoader::new(config);
    let oracle = LivenessOracle::new(config)?;

    let (graph, live) = rayon::join(|| loader.load(entry), || oracle.compute(entry));
    // Metadata problems explain build failures better than the reverse.
    let graph = graph?;
    let live = live?;

    let pruned = Pruner::new(&live).prune_graph(&graph)?;

    let gofmt;
    let formatter: &dyn SourceFormatter = if config.format {
        gofmt = Gofmt::new(config.gofmt.clone());
        &gofmt
    } else {
        &Passthrough
    };
    let report = Renderer::new(formatter).render(&graph, &pruned);

    info!(
        "Pruned {} declarations across {} files in {} packages ({} live symbols) in {:.2?}",
        report.stats.deleted,
        report.stats.files,
        report.stats.packages,
        live.len(),
        start_time.elapsed()
    );
    if report.stats.format_fallbacks > 0 {
        info!("{} files were emitted unformatted", report.stats.format_fallbacks);
    }

    Ok(RunOutput { report, live })
}
