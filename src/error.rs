use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors. Any of these aborts the run before a report is rendered.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("failed to load package metadata: {0}")]
    #[diagnostic(
        code(liveprune::metadata),
        help("run `go list -deps <entry>` to see the underlying problem")
    )]
    Metadata(String),

    #[error("import cycle involving package {0:?}")]
    #[diagnostic(code(liveprune::import_cycle))]
    ImportCycle(String),

    #[error("building {entry} failed: `{command}`\n{output}")]
    #[diagnostic(
        code(liveprune::build),
        help("the entry point must build with the Go toolchain on PATH")
    )]
    Build {
        entry: String,
        command: String,
        output: String,
    },

    #[error("symbol dump failed: {0}")]
    #[diagnostic(code(liveprune::symbol_dump))]
    SymbolDump(String),

    #[error("failed to run `{program}`")]
    #[diagnostic(code(liveprune::spawn))]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on {}", path.display())]
    #[diagnostic(code(liveprune::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Go grammar could not be loaded: {0}")]
    #[diagnostic(code(liveprune::grammar))]
    Grammar(String),

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(liveprune::config))]
    Config(String),

    #[error("invalid deletion [{start}, {end}) in {label}: {reason}")]
    #[diagnostic(code(liveprune::edit))]
    Edit {
        label: String,
        start: usize,
        end: usize,
        reason: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Error::Spawn {
            program: program.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reformatting a pruned buffer failed. Never fatal: the renderer falls back
/// to the unformatted buffer.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("formatter could not be started: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("formatter rejected the source: {0}")]
    Rejected(String),
}
