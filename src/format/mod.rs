//! Canonical reformatting of pruned sources.

use crate::error::FormatError;
use std::io::Write;
use std::process::{Command, Stdio};

/// Reformats a source buffer into canonical style
pub trait SourceFormatter: Sync {
    fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Pipes sources through `gofmt`
pub struct Gofmt {
    binary: String,
}

impl Gofmt {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl SourceFormatter for Gofmt {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        let mut child = Command::new(&self.binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Write from another thread so a full stdout pipe cannot stall us.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| FormatError::Rejected("stdin unavailable".to_string()))?;
        let input = source.to_string();
        let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .map_err(|_| FormatError::Rejected("stdin writer panicked".to_string()))?;

        if !output.status.success() {
            return Err(FormatError::Rejected(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        written?;
        String::from_utf8(output.stdout)
            .map_err(|e| FormatError::Rejected(format!("non-UTF-8 output: {}", e)))
    }
}

/// Leaves sources untouched
pub struct Passthrough;

impl SourceFormatter for Passthrough {
    fn format(&self, source: &str) -> Result<String, FormatError> {
        Ok(source.to_string())
    }
}
