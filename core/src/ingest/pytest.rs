use crate::bench_stats::human_duration;
use crate::model::Bench;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

#[derive(Deserialize)]
struct Report {
    benchmarks: Vec<PytestBenchmark>,
}

#[derive(Deserialize)]
struct PytestBenchmark {
    name: String,
    #[serde(default)]
    fullname: Option<String>,
    stats: PytestStats,
}

/// Durations are in seconds.
#[derive(Deserialize)]
struct PytestStats {
    mean: f64,
    stddev: f64,
    rounds: u64,
    #[serde(default)]
    ops: Option<f64>,
}

/// pytest-benchmark `--benchmark-json` report. Values are recorded as
/// throughput (`iter/sec`).
pub fn parse_pytest(text: &str) -> Result<Vec<Bench>> {
    let report: Report = serde_json::from_str(text).context("parse pytest-benchmark JSON report")?;
    report
        .benchmarks
        .into_iter()
        .map(|bench| {
            let stats = bench.stats;
            let ops = match stats.ops {
                Some(ops) => ops,
                None if stats.mean > 0.0 => 1.0 / stats.mean,
                None => return Err(anyhow!("benchmark '{}' has no ops and a zero mean", bench.name)),
            };
            let name = bench.fullname.unwrap_or(bench.name);
            Ok(Bench::new(name, ops, "iter/sec")
                .with_range(format!("stddev: {}", stats.stddev))
                .with_extra(format!("mean: {}\nrounds: {}", human_duration(stats.mean), stats.rounds)))
        })
        .collect()
}
