//! `benchtrail.toml` settings shared by every command.
//!
//! Resolution order is command-line flag, then config file, then the
//! defaults below.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "benchtrail.toml";
pub const DEFAULT_DATA_FILE: &str = "dev/bench/data.js";
pub const DEFAULT_SUITE: &str = "Benchmark";
pub const DEFAULT_TOOL: &str = "cargo";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_file: Option<PathBuf>,
    pub suite: Option<String>,
    pub tool: Option<String>,
    pub repo_url: Option<String>,
    pub alert_threshold: Option<String>,
    pub fail_threshold: Option<String>,
    pub max_items: Option<usize>,
    pub fail_on_alert: Option<bool>,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse benchtrail config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Load `explicit` if given, otherwise `benchtrail.toml` in `cwd` when present.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = cwd.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using discovered config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }

    pub fn suite(&self) -> &str {
        self.suite.as_deref().unwrap_or(DEFAULT_SUITE)
    }

    pub fn tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }
}
