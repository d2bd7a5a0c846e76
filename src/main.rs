use clap::Parser;
use colored::Colorize;
use liveprune::{report, Config, Error};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing::info;

/// liveprune - Show Go sources with link-time dead code removed
#[derive(Parser, Debug)]
#[command(name = "liveprune")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Go package to build, e.g. `./cmd/server` or an import path
    entry: String,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Compare the report with an expected one instead of printing it
    #[arg(long, value_name = "FILE")]
    check: Option<PathBuf>,

    /// Write the liveness set as JSON
    #[arg(long, value_name = "FILE")]
    dump_live: Option<PathBuf>,

    /// Go command to use
    #[arg(long, value_name = "PROGRAM")]
    go: Option<String>,

    /// Formatter to pipe pruned sources through
    #[arg(long, value_name = "PROGRAM")]
    gofmt: Option<String>,

    /// Emit pruned sources without reformatting
    #[arg(long)]
    no_format: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("liveprune v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let output = liveprune::run(&config, &cli.entry)?;

    if let Some(path) = &cli.dump_live {
        let json = serde_json::to_string_pretty(&output.live).into_diagnostic()?;
        std::fs::write(path, json + "\n").map_err(|e| Error::io(path, e))?;
        info!("Liveness set written to {}", path.display());
    }

    if let Some(path) = &cli.check {
        let expected = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        match report::compare(&expected, &output.report.text) {
            None => {
                if !cli.quiet {
                    eprintln!("{} {}", "✓".green(), format!("report matches {}", path.display()).green());
                }
            }
            Some(mismatch) => {
                eprintln!("{} {}", "✗".red(), format!("report differs from {}", path.display()).red());
                eprintln!("{}", mismatch);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &output.report.text).map_err(|e| Error::io(path, e))?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", output.report.text),
    }

    Ok(())
}

// Logs go to stderr; stdout carries the report.
fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        let cwd = std::env::current_dir().map_err(|e| Error::io(".", e))?;
        Config::from_default_locations(&cwd)?
    };

    // Override with CLI arguments
    if let Some(go) = &cli.go {
        config.go = go.clone();
    }
    if let Some(gofmt) = &cli.gofmt {
        config.gofmt = gofmt.clone();
    }
    if cli.no_format {
        config.format = false;
    }

    Ok(config)
}
