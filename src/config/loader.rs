use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a liveprune run.
///
/// Everything here has a working default; the entry point is the only
/// required input and comes from the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Go command used for `list`, `build` and `tool nm`
    pub go: String,

    /// Formatter binary reading source on stdin
    pub gofmt: String,

    /// Extra flags passed to `go build`; the defaults disable optimisation
    /// and inlining so linked symbols match the source declarations
    pub build_flags: Vec<String>,

    /// Regular expressions for linker symbols that never count as live
    pub deny_symbols: Vec<String>,

    /// Reformat pruned sources with `gofmt`
    pub format: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            go: "go".to_string(),
            gofmt: "gofmt".to_string(),
            build_flags: vec!["-gcflags=all=-N -l".to_string()],
            deny_symbols: vec![],
            format: true,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
            "toml" => toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
            _ => {
                // Try YAML first, then TOML
                match serde_yaml::from_str(&contents) {
                    Ok(config) => config,
                    Err(_) => toml::from_str(&contents)
                        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(dir: &Path) -> Result<Self> {
        let default_names = [
            ".liveprune.yml",
            ".liveprune.yaml",
            ".liveprune.toml",
            "liveprune.yml",
            "liveprune.yaml",
            "liveprune.toml",
        ];

        for name in &default_names {
            let path = dir.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Compile the configured deny patterns
    pub fn deny_patterns(&self) -> Result<Vec<Regex>> {
        self.deny_symbols
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| Error::Config(format!("deny_symbols {:?}: {}", p, e)))
            })
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.go.trim().is_empty() {
            return Err(Error::Config("`go` must name a command".to_string()));
        }
        self.deny_patterns().map(|_| ())
    }
}
