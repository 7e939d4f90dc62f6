//! Converters from benchmark tool output into [`Bench`] lists.

mod cargo;
mod custom;
mod pytest;

#[cfg(test)]
mod ingest_test;

pub use cargo::parse_cargo;
pub use custom::parse_custom;
pub use pytest::parse_pytest;

use crate::model::Bench;
use crate::tool::Tool;
use anyhow::{Result, bail};
use std::collections::HashSet;

/// Parse `text` as output of `tool` and check the result is appendable.
pub fn ingest(tool: &Tool, text: &str) -> Result<Vec<Bench>> {
    let benches = match tool {
        Tool::Pytest => parse_pytest(text)?,
        Tool::Cargo => parse_cargo(text)?,
        Tool::CustomBiggerIsBetter | Tool::CustomSmallerIsBetter => parse_custom(text)?,
        other => bail!("tool '{}' is not supported for ingestion", other),
    };
    check_benches(tool, &benches)?;
    tracing::debug!(tool = %tool, count = benches.len(), "ingested benchmark results");
    Ok(benches)
}

fn check_benches(tool: &Tool, benches: &[Bench]) -> Result<()> {
    if benches.is_empty() {
        bail!("no benchmark results found in {} output", tool);
    }
    let mut seen = HashSet::with_capacity(benches.len());
    for bench in benches {
        if !seen.insert(bench.name.as_str()) {
            bail!("duplicate benchmark name '{}' in {} output", bench.name, tool);
        }
        if !bench.value.is_finite() {
            bail!("benchmark '{}' has non-finite value {}", bench.name, bench.value);
        }
    }
    Ok(())
}
