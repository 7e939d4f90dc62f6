//! Appending runs to a suite's history.

use crate::model::{BenchmarkData, Entry};
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Keep at most this many entries per suite, dropping the oldest.
    pub max_items: Option<usize>,
    /// Epoch milliseconds stored as `lastUpdate`.
    pub now_ms: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppendOutcome {
    /// Most recent earlier run for a different commit, the comparison baseline.
    pub previous: Option<Entry>,
    /// The suite's last run was for the same commit and has been overwritten.
    pub replaced: bool,
    pub evicted: usize,
}

pub fn append(data: &mut BenchmarkData, suite: &str, entry: Entry, opts: &AppendOptions) -> AppendOutcome {
    let entries = data.entries.entry(suite.to_string()).or_default();

    let previous = entries
        .iter()
        .rev()
        .find(|existing| existing.commit.id != entry.commit.id)
        .cloned();

    let replaced = entries
        .last()
        .is_some_and(|last| last.commit.id == entry.commit.id);
    let commit = entry.short_id().to_string();
    if replaced {
        if let Some(last) = entries.last_mut() {
            *last = entry;
        }
    } else {
        entries.push(entry);
    }

    let mut evicted = 0;
    if let Some(limit) = opts.max_items {
        let limit = limit.max(1);
        if entries.len() > limit {
            evicted = entries.len() - limit;
            entries.drain(..evicted);
            warn!(suite, evicted, limit, "dropped oldest entries past max_items");
        }
    }

    data.last_update = opts.now_ms;
    info!(suite, commit = %commit, replaced, total = entries.len(), "appended benchmark run");

    AppendOutcome {
        previous,
        replaced,
        evicted,
    }
}

/// Locate a run by commit id (full hash or prefix); `None` selects the latest.
pub fn find_entry<'a>(entries: &'a [Entry], commit: Option<&str>) -> Option<(usize, &'a Entry)> {
    match commit {
        None => entries.len().checked_sub(1).map(|idx| (idx, &entries[idx])),
        Some(prefix) if prefix.is_empty() => None,
        Some(prefix) => entries
            .iter()
            .enumerate()
            .rev()
            .find(|(_, entry)| entry.commit.id.starts_with(prefix)),
    }
}

/// The baseline an existing run at `index` would have been compared against.
pub fn previous_of(entries: &[Entry], index: usize) -> Option<&Entry> {
    let current = entries.get(index)?;
    entries[..index]
        .iter()
        .rev()
        .find(|entry| entry.commit.id != current.commit.id)
}

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;
