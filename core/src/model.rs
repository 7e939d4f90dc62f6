use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Whole history file as consumed by the dashboard page.
///
/// `entries` maps a benchmark suite name to its runs in the order they were
/// appended (oldest first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkData {
    /// Epoch milliseconds of the last write.
    pub last_update: i64,
    pub repo_url: String,
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<Entry>>,
}

impl BenchmarkData {
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            last_update: 0,
            repo_url: repo_url.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn suite(&self, name: &str) -> Option<&[Entry]> {
        self.entries.get(name).map(|entries| entries.as_slice())
    }

    pub fn suite_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn total_entries(&self) -> usize {
        self.entries.values().map(|v| v.len()).sum()
    }
}

/// One CI run: the measurements captured for a single commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub commit: Commit,
    /// Epoch milliseconds when the run was recorded.
    pub date: i64,
    pub tool: String,
    pub benches: Vec<Bench>,
}

impl Entry {
    pub fn bench(&self, name: &str) -> Option<&Bench> {
        self.benches.iter().find(|b| b.name == name)
    }

    pub fn short_id(&self) -> &str {
        self.commit.short_id()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub author: Person,
    #[serde(default)]
    pub committer: Person,
    #[serde(default)]
    pub distinct: bool,
    pub id: String,
    #[serde(default)]
    pub message: String,
    /// RFC 3339 commit timestamp, kept verbatim.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub tree_id: String,
    #[serde(default)]
    pub url: String,
}

impl Commit {
    /// Commit metadata for callers that only know the hash.
    pub fn minimal(id: impl Into<String>) -> Self {
        Self {
            distinct: true,
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn short_id(&self) -> &str {
        short_commit_id(&self.id)
    }
}

/// First seven characters of a commit hash.
pub fn short_commit_id(id: &str) -> &str {
    match id.char_indices().nth(7) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A single named measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bench {
    pub name: String,
    #[serde(serialize_with = "serialize_js_number")]
    pub value: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

// Whole values are written without a fractional part, as `JSON.stringify` does.
fn serialize_js_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl Bench {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            range: None,
            extra: None,
        }
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_truncates_to_seven() {
        let commit = Commit::minimal("3e16038f8ce6bf76c927176d4d1fc8f4a73c2771");
        assert_eq!(commit.short_id(), "3e16038");
        assert_eq!(Commit::minimal("abc").short_id(), "abc");
        assert_eq!(short_commit_id("feedfacecafe"), "feedfac");
    }

    #[test]
    fn test_whole_bench_values_serialize_as_integers() {
        let json = serde_json::to_string(&Bench::new("parse", 1200.0, "ns/iter")).expect("serialize");
        assert_eq!(json, r#"{"name":"parse","value":1200,"unit":"ns/iter"}"#);
        let json = serde_json::to_string(&Bench::new("mnist", 4.25, "iter/sec")).expect("serialize");
        assert!(json.contains(r#""value":4.25"#));
        let back: Bench = serde_json::from_str(r#"{"name":"parse","value":1200,"unit":"ns/iter"}"#).expect("parse");
        assert_eq!(back.value, 1200.0);
    }

    #[test]
    fn test_commit_defaults_missing_fields() {
        let commit: Commit = serde_json::from_str(r#"{"id":"deadbeef"}"#).expect("minimal commit");
        assert_eq!(commit.id, "deadbeef");
        assert!(commit.message.is_empty());
        assert!(commit.author.username.is_none());
    }

    #[test]
    fn test_bench_omits_absent_optionals() {
        let bench = Bench::new("a", 1.5, "ns/iter");
        let json = serde_json::to_string(&bench).expect("serialize bench");
        assert_eq!(json, r#"{"name":"a","value":1.5,"unit":"ns/iter"}"#);
    }

    #[test]
    fn test_total_entries_counts_all_suites() {
        let mut data = BenchmarkData::new("https://example.com/repo");
        let entry = Entry {
            commit: Commit::minimal("a"),
            date: 1,
            tool: "cargo".to_string(),
            benches: vec![Bench::new("x", 1.0, "ns/iter")],
        };
        data.entries.insert("one".to_string(), vec![entry.clone(), entry.clone()]);
        data.entries.insert("two".to_string(), vec![entry]);
        assert_eq!(data.total_entries(), 3);
        assert_eq!(data.suite_names().collect::<Vec<_>>(), vec!["one", "two"]);
        assert_eq!(data.suite("one").map(|s| s.len()), Some(2));
        assert!(data.suite("missing").is_none());
    }
}
