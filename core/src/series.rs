//! A single bench followed across a suite's history.

use crate::model::BenchmarkData;

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub commit: String,
    pub date: i64,
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub p95: f64,
    pub latest: f64,
    /// Relative change of the latest value against the first, `0.1` = +10%.
    /// `None` when the first value is zero.
    pub change_from_first: Option<f64>,
}

/// Every recorded value of `bench` in `suite`, oldest first. Runs that did not
/// record the bench are skipped.
pub fn series(data: &BenchmarkData, suite: &str, bench: &str) -> Vec<Point> {
    data.suite(suite)
        .unwrap_or_default()
        .iter()
        .filter_map(|entry| {
            entry.bench(bench).map(|b| Point {
                commit: entry.commit.id.clone(),
                date: entry.date,
                value: b.value,
                unit: b.unit.clone(),
            })
        })
        .collect()
}

pub fn summarize(points: &[Point]) -> Option<Summary> {
    let first = points.first()?.value;
    let latest = points.last()?.value;

    let mut sorted: Vec<f64> = points.iter().map(|p| p.value).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;

    Some(Summary {
        count,
        min: sorted[0],
        max: sorted[count - 1],
        mean,
        median: quantile(&sorted, 0.5),
        p95: quantile(&sorted, 0.95),
        latest,
        change_from_first: (first != 0.0).then(|| (latest - first) / first),
    })
}

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = pos - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bench, Commit, Entry};

    fn data_with(values: &[Option<f64>]) -> BenchmarkData {
        let mut data = BenchmarkData::new("r");
        let entries = values
            .iter()
            .enumerate()
            .map(|(i, value)| Entry {
                commit: Commit::minimal(format!("c{}", i)),
                date: i as i64,
                tool: "cargo".to_string(),
                benches: value
                    .map(|v| vec![Bench::new("parse", v, "ns/iter")])
                    .unwrap_or_else(|| vec![Bench::new("other", 1.0, "ns/iter")]),
            })
            .collect();
        data.entries.insert("Rust".to_string(), entries);
        data
    }

    #[test]
    fn test_series_skips_runs_without_bench() {
        let data = data_with(&[Some(10.0), None, Some(30.0)]);
        let points = series(&data, "Rust", "parse");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].commit, "c0");
        assert_eq!(points[1].date, 2);
        assert!(series(&data, "Missing", "parse").is_empty());
    }

    #[test]
    fn test_summarize_statistics() {
        let data = data_with(&[Some(40.0), Some(10.0), Some(20.0), Some(30.0), Some(50.0)]);
        let summary = summarize(&series(&data, "Rust", "parse")).expect("summary");
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 50.0);
        assert_eq!(summary.mean, 30.0);
        assert_eq!(summary.median, 30.0);
        assert!((summary.p95 - 48.0).abs() < 1e-9);
        assert_eq!(summary.latest, 50.0);
        assert_eq!(summary.change_from_first, Some(0.25));
    }

    #[test]
    fn test_summarize_empty_and_zero_start() {
        assert!(summarize(&[]).is_none());
        let data = data_with(&[Some(0.0), Some(5.0)]);
        let summary = summarize(&series(&data, "Rust", "parse")).expect("summary");
        assert!(summary.change_from_first.is_none());
    }
}
