use crate::model::Bench;
use anyhow::{Context, Result};

/// JSON array of `{name, value, unit, range?, extra?}` objects.
pub fn parse_custom(text: &str) -> Result<Vec<Bench>> {
    serde_json::from_str(text).context("parse custom benchmark JSON (expected an array of benches)")
}
