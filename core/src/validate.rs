//! Shape checks for a decoded history file.

use crate::model::BenchmarkData;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    EmptySuite,
    EmptyCommitId,
    NoBenches,
    EmptyBenchName,
    DuplicateBench(String),
    NonFiniteValue(String),
    EmptyUnit(String),
    DateWentBackwards { previous: i64, current: i64 },
    StaleLastUpdate { last_update: i64, newest: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub suite: Option<String>,
    pub entry: Option<usize>,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.suite, self.entry) {
            (Some(suite), Some(idx)) => write!(f, "{}[{}]: ", suite, idx)?,
            (Some(suite), None) => write!(f, "{}: ", suite)?,
            _ => {}
        }
        match &self.kind {
            IssueKind::EmptySuite => write!(f, "suite has no entries"),
            IssueKind::EmptyCommitId => write!(f, "commit id is empty"),
            IssueKind::NoBenches => write!(f, "entry has no benches"),
            IssueKind::EmptyBenchName => write!(f, "bench with empty name"),
            IssueKind::DuplicateBench(name) => write!(f, "bench '{}' recorded more than once", name),
            IssueKind::NonFiniteValue(name) => write!(f, "bench '{}' has a non-finite value", name),
            IssueKind::EmptyUnit(name) => write!(f, "bench '{}' has no unit", name),
            IssueKind::DateWentBackwards { previous, current } => {
                write!(f, "date {} is earlier than the previous entry's {}", current, previous)
            }
            IssueKind::StaleLastUpdate { last_update, newest } => {
                write!(f, "lastUpdate {} is earlier than the newest entry date {}", last_update, newest)
            }
        }
    }
}

pub fn validate(data: &BenchmarkData) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut newest = None::<i64>;

    for (suite, entries) in &data.entries {
        let suite_issue = |entry: Option<usize>, kind: IssueKind| Issue {
            suite: Some(suite.clone()),
            entry,
            kind,
        };
        if entries.is_empty() {
            issues.push(suite_issue(None, IssueKind::EmptySuite));
            continue;
        }

        let mut previous_date = None::<i64>;
        for (idx, entry) in entries.iter().enumerate() {
            if entry.commit.id.trim().is_empty() {
                issues.push(suite_issue(Some(idx), IssueKind::EmptyCommitId));
            }
            if let Some(previous) = previous_date
                && entry.date < previous
            {
                issues.push(suite_issue(
                    Some(idx),
                    IssueKind::DateWentBackwards {
                        previous,
                        current: entry.date,
                    },
                ));
            }
            previous_date = Some(entry.date);
            newest = Some(newest.map_or(entry.date, |n| n.max(entry.date)));

            if entry.benches.is_empty() {
                issues.push(suite_issue(Some(idx), IssueKind::NoBenches));
            }
            let mut seen = HashSet::new();
            for bench in &entry.benches {
                if bench.name.is_empty() {
                    issues.push(suite_issue(Some(idx), IssueKind::EmptyBenchName));
                    continue;
                }
                if !seen.insert(bench.name.as_str()) {
                    issues.push(suite_issue(Some(idx), IssueKind::DuplicateBench(bench.name.clone())));
                }
                if !bench.value.is_finite() {
                    issues.push(suite_issue(Some(idx), IssueKind::NonFiniteValue(bench.name.clone())));
                }
                if bench.unit.trim().is_empty() {
                    issues.push(suite_issue(Some(idx), IssueKind::EmptyUnit(bench.name.clone())));
                }
            }
        }
    }

    if let Some(newest) = newest
        && data.last_update < newest
    {
        issues.push(Issue {
            suite: None,
            entry: None,
            kind: IssueKind::StaleLastUpdate {
                last_update: data.last_update,
                newest,
            },
        });
    }
    issues
}
