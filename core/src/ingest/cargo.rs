use crate::model::Bench;
use anyhow::{Context, Result, anyhow};

const BENCH_MARKER: &str = " ... bench:";

/// libtest / criterion `--output-format bencher` lines:
/// `test parse_small ... bench:       1,234 ns/iter (+/- 56)`.
/// Other lines are ignored.
pub fn parse_cargo(text: &str) -> Result<Vec<Bench>> {
    let mut benches = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let Some(rest) = line.trim().strip_prefix("test ") else {
            continue;
        };
        let Some((name, measurement)) = rest.split_once(BENCH_MARKER) else {
            continue;
        };
        let bench = parse_measurement(name.trim(), measurement)
            .with_context(|| format!("parse cargo bench output line {}", idx + 1))?;
        benches.push(bench);
    }
    Ok(benches)
}

fn parse_measurement(name: &str, measurement: &str) -> Result<Bench> {
    let mut parts = measurement.split_whitespace();
    let raw_value = parts.next().ok_or_else(|| anyhow!("missing value for '{}'", name))?;
    let value: f64 = raw_value
        .replace(',', "")
        .parse()
        .with_context(|| format!("non-numeric value '{}' for '{}'", raw_value, name))?;
    let unit = parts.next().ok_or_else(|| anyhow!("missing unit for '{}'", name))?;

    let mut bench = Bench::new(name, value, unit);
    let tail = parts.collect::<Vec<_>>().join(" ");
    if let Some(spread) = tail
        .strip_prefix("(+/-")
        .and_then(|s| s.strip_suffix(')'))
        .map(str::trim)
    {
        bench = bench.with_range(format!("± {}", spread));
    }
    Ok(bench)
}
