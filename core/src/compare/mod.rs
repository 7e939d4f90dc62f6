//! Regression detection between two runs of the same suite.
//!
//! Every bench is reduced to a single worsening ratio: how many times worse
//! the current value is than the previous one, taking the bench's
//! [`Direction`] into account. A ratio of `1.0` means unchanged, `2.0` means
//! twice as slow (or half the throughput).

mod threshold;


pub use threshold::Threshold;

use crate::model::{Bench, Entry};
use crate::tool::{Direction, Tool};
use anyhow::{Result, bail};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompareOptions {
    pub alert: Threshold,
    pub fail: Threshold,
}

impl CompareOptions {
    /// `fail` defaults to `alert` and may not be lower than it.
    pub fn new(alert: Threshold, fail: Option<Threshold>) -> Result<Self> {
        let fail = fail.unwrap_or(alert);
        if fail < alert {
            bail!("fail threshold {} is lower than alert threshold {}", fail, alert);
        }
        Ok(Self { alert, fail })
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            alert: Threshold::DEFAULT,
            fail: Threshold::DEFAULT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Ok,
    Improved,
    Alert,
    Fail,
    New,
    Incomparable,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Improved => "IMPROVED",
            Verdict::Alert => "ALERT",
            Verdict::Fail => "FAIL",
            Verdict::New => "NEW",
            Verdict::Incomparable => "INCOMPARABLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchComparison {
    pub name: String,
    pub unit: String,
    pub current: f64,
    pub current_range: Option<String>,
    pub previous: Option<f64>,
    pub previous_unit: Option<String>,
    pub previous_range: Option<String>,
    pub ratio: Option<f64>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub current_commit: String,
    pub previous_commit: String,
    pub options: CompareOptions,
    pub rows: Vec<BenchComparison>,
    /// Benches recorded in the previous run only.
    pub removed: Vec<String>,
}

impl Comparison {
    pub fn alerts(&self) -> impl Iterator<Item = &BenchComparison> {
        self.rows
            .iter()
            .filter(|row| matches!(row.verdict, Verdict::Alert | Verdict::Fail))
    }

    pub fn failures(&self) -> impl Iterator<Item = &BenchComparison> {
        self.rows.iter().filter(|row| row.verdict == Verdict::Fail)
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.alerts().next().is_none()
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.rows.iter().filter(|row| row.verdict == verdict).count()
    }
}

/// Worsening ratio of `current` relative to `previous`.
pub fn worsening_ratio(previous: f64, current: f64, direction: Direction) -> f64 {
    let (numerator, denominator) = match direction {
        Direction::BiggerIsBetter => (previous, current),
        Direction::SmallerIsBetter => (current, previous),
    };
    if denominator == 0.0 {
        if numerator == 0.0 { 1.0 } else { f64::INFINITY }
    } else {
        numerator / denominator
    }
}

pub fn compare(previous: &Entry, current: &Entry, tool: &Tool, opts: &CompareOptions) -> Comparison {
    let previous_by_name: HashMap<&str, &Bench> = previous.benches.iter().map(|b| (b.name.as_str(), b)).collect();

    let rows = current
        .benches
        .iter()
        .map(|bench| compare_bench(previous_by_name.get(bench.name.as_str()).copied(), bench, tool, opts))
        .collect();

    let removed = previous
        .benches
        .iter()
        .filter(|b| current.bench(&b.name).is_none())
        .map(|b| b.name.clone())
        .collect();

    Comparison {
        current_commit: current.commit.id.clone(),
        previous_commit: previous.commit.id.clone(),
        options: *opts,
        rows,
        removed,
    }
}

fn compare_bench(previous: Option<&Bench>, current: &Bench, tool: &Tool, opts: &CompareOptions) -> BenchComparison {
    let mut row = BenchComparison {
        name: current.name.clone(),
        unit: current.unit.clone(),
        current: current.value,
        current_range: current.range.clone(),
        previous: previous.map(|b| b.value),
        previous_unit: previous.map(|b| b.unit.clone()),
        previous_range: previous.and_then(|b| b.range.clone()),
        ratio: None,
        verdict: Verdict::New,
    };

    let Some(previous) = previous else {
        debug!(bench = %current.name, "no previous measurement");
        return row;
    };
    if previous.unit != current.unit {
        warn!(
            bench = %current.name,
            previous_unit = %previous.unit,
            current_unit = %current.unit,
            "unit changed; skipping comparison"
        );
        row.verdict = Verdict::Incomparable;
        return row;
    }

    let ratio = worsening_ratio(previous.value, current.value, tool.direction(&current.unit));
    row.ratio = Some(ratio);
    row.verdict = if ratio > opts.fail.ratio() {
        Verdict::Fail
    } else if ratio > opts.alert.ratio() {
        Verdict::Alert
    } else if ratio < 1.0 / opts.alert.ratio() {
        Verdict::Improved
    } else {
        Verdict::Ok
    };
    row
}
