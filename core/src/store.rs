use crate::codec;
use crate::model::BenchmarkData;
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Read a history file. A missing file starts a fresh history when
/// `repo_url` is known.
pub fn load(path: &Path, repo_url: Option<&str>) -> Result<BenchmarkData> {
    if !path.exists() {
        return match repo_url {
            Some(url) => {
                tracing::info!(path = %path.display(), "history file missing; starting a new one");
                Ok(BenchmarkData::new(url))
            }
            None => Err(anyhow!(
                "history file {} does not exist (pass a repo URL to create it)",
                path.display()
            )),
        };
    }
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let data = codec::decode(&text).with_context(|| format!("decode {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        suites = data.entries.len(),
        entries = data.total_entries(),
        "loaded benchmark history"
    );
    Ok(data)
}

/// Replace `path` atomically with the encoded history.
pub fn save(path: &Path, data: &BenchmarkData) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;
    }

    let text = codec::encode(data)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.flush()?;
    let permissions = match fs::metadata(path) {
        Ok(existing) => fs::set_permissions(tmp.path(), existing.permissions()),
        Err(_) => set_default_mode(tmp.path()),
    };
    permissions.with_context(|| format!("set permissions on {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|err| anyhow!("replace {}: {}", path.display(), err.error))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "saved benchmark history");
    Ok(())
}

// Temp files start out owner-only.
#[cfg(unix)]
fn set_default_mode(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_mode(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bench, Commit, Entry};

    #[test]
    fn test_load_missing_requires_repo_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.js");
        assert!(load(&path, None).is_err());
        let fresh = load(&path, Some("https://example.com/repo")).expect("fresh history");
        assert_eq!(fresh.repo_url, "https://example.com/repo");
        assert!(fresh.entries.is_empty());
    }

    #[test]
    fn test_save_creates_parents_and_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dev").join("bench").join("data.js");
        let mut data = BenchmarkData::new("https://example.com/repo");
        data.last_update = 99;
        data.entries.insert(
            "Rust".to_string(),
            vec![Entry {
                commit: Commit::minimal("abc"),
                date: 98,
                tool: "cargo".to_string(),
                benches: vec![Bench::new("parse", 12.0, "ns/iter")],
            }],
        );

        save(&path, &data).expect("save");
        let raw = fs::read_to_string(&path).expect("read back");
        assert!(raw.starts_with(codec::DATA_PREFIX));
        assert_eq!(load(&path, None).expect("load"), data);

        data.last_update = 100;
        save(&path, &data).expect("overwrite");
        assert_eq!(load(&path, None).expect("reload").last_update, 100);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let data = BenchmarkData::new("https://example.com/repo");
        let mode = |path: &Path| fs::metadata(path).expect("metadata").permissions().mode() & 0o777;

        let fresh = dir.path().join("fresh.js");
        save(&fresh, &data).expect("save fresh");
        assert_eq!(mode(&fresh), 0o644);

        let shared = dir.path().join("data.js");
        fs::write(&shared, "window.BENCHMARK_DATA = {}").expect("write");
        fs::set_permissions(&shared, fs::Permissions::from_mode(0o664)).expect("chmod");
        save(&shared, &data).expect("save over existing");
        assert_eq!(mode(&shared), 0o664);
    }

    #[test]
    fn test_load_reports_decode_position() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("data.js");
        fs::write(&path, "window.BENCHMARK_DATA = {\n  \"lastUpdate\": }").expect("write");
        let err = load(&path, None).expect_err("broken file");
        let chain = format!("{:#}", err);
        assert!(chain.contains("decode"));
        assert!(chain.contains("at 2:"), "unexpected error: {}", chain);
    }
}
