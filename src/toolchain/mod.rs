//! Thin wrappers around the Go commands this crate drives.
//!
//! Every invocation is one-shot: failures are reported with the captured
//! output and never retried.

use crate::config::Config;
use crate::error::{Error, Result};
use std::io::{BufReader, Read};
use std::path::Path;
use std::process::{ChildStdout, Command, Stdio};
use tracing::debug;

/// The Go toolchain as configured for one run
#[derive(Debug, Clone)]
pub struct GoToolchain {
    go: String,
    build_flags: Vec<String>,
}

impl GoToolchain {
    pub fn new(config: &Config) -> Self {
        Self {
            go: config.go.clone(),
            build_flags: config.build_flags.clone(),
        }
    }

    /// `go list -e -deps -json <entry>`: the JSON package stream
    pub fn list_deps(&self, entry: &str) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&self.go);
        cmd.args(["list", "-e", "-deps", "-json", entry]);
        debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|e| Error::spawn(&self.go, e))?;
        if !output.status.success() {
            return Err(Error::Metadata(format!(
                "{:?} exited with {}: {}",
                cmd,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }

    /// Build `entry` into `out` with the configured flags
    pub fn build(&self, entry: &str, out: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.go);
        cmd.arg("build").arg("-o").arg(out);
        cmd.args(&self.build_flags);
        cmd.arg(entry);
        debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|e| Error::spawn(&self.go, e))?;
        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(Error::Build {
                entry: entry.to_string(),
                command: format!("{:?}", cmd),
                output: combined.trim_end().to_string(),
            });
        }
        Ok(())
    }

    /// Run `go tool nm <binary>` and hand its standard output to `consume`.
    ///
    /// Standard error is drained on its own thread so neither pipe can stall
    /// the tool. If `consume` fails the tool is killed and reaped before the
    /// error is returned.
    pub fn nm<T>(
        &self,
        binary: &Path,
        consume: impl FnOnce(BufReader<ChildStdout>) -> Result<T>,
    ) -> Result<T> {
        let mut cmd = Command::new(&self.go);
        cmd.args(["tool", "nm"]).arg(binary);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        debug!("running {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| Error::spawn(&self.go, e))?;
        let (stdout, mut stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(stdout), Some(stderr)) => (stdout, stderr),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::SymbolDump("nm output streams unavailable".to_string()));
            }
        };
        let drain = std::thread::spawn(move || {
            let mut text = String::new();
            let _ = stderr.read_to_string(&mut text);
            text
        });

        let consumed = consume(BufReader::new(stdout));
        if consumed.is_err() {
            let _ = child.kill();
        }
        let status = child
            .wait()
            .map_err(|e| Error::SymbolDump(format!("waiting for nm: {}", e)));
        let errors = drain.join().unwrap_or_default();

        let value = consumed?;
        let status = status?;
        if !status.success() {
            return Err(Error::SymbolDump(format!(
                "{:?} exited with {}: {}",
                cmd,
                status,
                errors.trim()
            )));
        }
        Ok(value)
    }
}

/// Whether `program version` runs successfully
pub fn is_available(program: &str) -> bool {
    Command::new(program)
        .arg("version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
