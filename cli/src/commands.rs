use crate::{CommitArgs, ExportFormat, ReportFormat, Target, ThresholdArgs};
use anyhow::{Context, Result, anyhow, bail};
use benchtrail_core::{
    BenchmarkData, Commit, Entry, Person, Tool,
    compare::{CompareOptions, Comparison, Threshold, compare as compare_runs},
    config::Config,
    history::{self, AppendOptions},
    ingest,
    model::short_commit_id,
    report, series, store, validate as shape,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Clean,
    Failed,
}

pub(crate) struct AppendRequest {
    pub target: Target,
    pub input: PathBuf,
    pub tool: Option<String>,
    pub repo_url: Option<String>,
    pub commit: CommitArgs,
    pub date: Option<String>,
    pub max_items: Option<usize>,
    pub thresholds: ThresholdArgs,
    pub format: ReportFormat,
    pub dry_run: bool,
}

fn data_path(config: &Config, target: &Target) -> PathBuf {
    target.data.clone().unwrap_or_else(|| config.data_file())
}

fn suite_name<'a>(config: &'a Config, target: &'a Target) -> &'a str {
    target.suite.as_deref().unwrap_or_else(|| config.suite())
}

pub(crate) fn compare_options(config: &Config, args: &ThresholdArgs) -> Result<CompareOptions> {
    let alert = match args.alert_threshold.as_deref().or(config.alert_threshold.as_deref()) {
        Some(raw) => Threshold::parse(raw).context("--alert-threshold")?,
        None => Threshold::DEFAULT,
    };
    let fail = args
        .fail_threshold
        .as_deref()
        .or(config.fail_threshold.as_deref())
        .map(|raw| Threshold::parse(raw).context("--fail-threshold"))
        .transpose()?;
    CompareOptions::new(alert, fail)
}

pub(crate) fn parse_millis(raw: &str) -> Result<i64> {
    let parsed = DateTime::parse_from_rfc3339(raw.trim()).with_context(|| format!("parse '{}' as RFC 3339", raw))?;
    Ok(parsed.with_timezone(&Utc).timestamp_millis())
}

pub(crate) fn build_commit(args: &CommitArgs, repo_url: &str) -> Result<Commit> {
    let id = args
        .commit_id
        .clone()
        .or_else(|| std::env::var("GITHUB_SHA").ok())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| anyhow!("commit id required: pass --commit-id or set GITHUB_SHA"))?;

    if let Some(timestamp) = &args.commit_timestamp {
        DateTime::parse_from_rfc3339(timestamp)
            .with_context(|| format!("parse --commit-timestamp '{}' as RFC 3339", timestamp))?;
    }

    let url = match &args.commit_url {
        Some(url) => url.clone(),
        None if !repo_url.is_empty() => format!("{}/commit/{}", repo_url.trim_end_matches('/'), id),
        None => String::new(),
    };
    let author = Person {
        email: args.author_email.clone().unwrap_or_default(),
        name: args.author_name.clone().unwrap_or_default(),
        username: None,
    };

    Ok(Commit {
        committer: author.clone(),
        author,
        message: args.commit_message.clone().unwrap_or_default(),
        timestamp: args.commit_timestamp.clone().unwrap_or_default(),
        url,
        ..Commit::minimal(id)
    })
}

fn print_report(suite: &str, comparison: &Comparison, format: ReportFormat) {
    match format {
        ReportFormat::Text => print!("{}", report::render_text(comparison)),
        ReportFormat::Markdown => print!("{}", report::render_markdown(suite, comparison)),
    }
}

fn status_of(comparison: &Comparison, fail_on_alert: bool) -> Status {
    if comparison.has_failures() || (fail_on_alert && !comparison.is_clean()) {
        Status::Failed
    } else {
        Status::Clean
    }
}

fn fail_on_alert(config: &Config, args: &ThresholdArgs) -> bool {
    args.fail_on_alert || config.fail_on_alert.unwrap_or(false)
}

pub(crate) fn append(config: &Config, req: AppendRequest) -> Result<Status> {
    let path = data_path(config, &req.target);
    let suite = suite_name(config, &req.target).to_string();
    let tool = Tool::from(req.tool.as_deref().unwrap_or_else(|| config.tool()));
    let opts = compare_options(config, &req.thresholds)?;

    let raw = fs::read_to_string(&req.input).with_context(|| format!("read {}", req.input.display()))?;
    let benches = ingest::ingest(&tool, &raw).with_context(|| format!("ingest {}", req.input.display()))?;

    let repo_url = req.repo_url.as_deref().or(config.repo_url.as_deref());
    let mut data = store::load(&path, repo_url)?;
    if data.repo_url.is_empty()
        && let Some(url) = repo_url
    {
        data.repo_url = url.to_string();
    }

    let now_ms = match &req.date {
        Some(raw) => parse_millis(raw).context("--date")?,
        None => Utc::now().timestamp_millis(),
    };
    let entry = Entry {
        commit: build_commit(&req.commit, &data.repo_url)?,
        date: now_ms,
        tool: tool.to_string(),
        benches,
    };

    let outcome = history::append(
        &mut data,
        &suite,
        entry.clone(),
        &AppendOptions {
            max_items: req.max_items.or(config.max_items),
            now_ms,
        },
    );

    if req.dry_run {
        tracing::info!(path = %path.display(), "dry run; history file left untouched");
    } else {
        store::save(&path, &data)?;
    }

    let Some(previous) = outcome.previous else {
        println!(
            "Recorded {} benches for {} in '{}'; no earlier run to compare against.",
            entry.benches.len(),
            entry.short_id(),
            suite
        );
        return Ok(Status::Clean);
    };

    let comparison = compare_runs(&previous, &entry, &tool, &opts);
    print_report(&suite, &comparison, req.format);
    Ok(status_of(&comparison, fail_on_alert(config, &req.thresholds)))
}

pub(crate) fn compare(
    config: &Config,
    target: &Target,
    commit: Option<&str>,
    thresholds: &ThresholdArgs,
    format: ReportFormat,
) -> Result<Status> {
    let data = load_existing(config, target)?;
    let suite = suite_name(config, target);
    let entries = suite_entries(&data, suite)?;
    let opts = compare_options(config, thresholds)?;

    let (index, current) = history::find_entry(entries, commit).ok_or_else(|| match commit {
        Some(id) => anyhow!("no run for commit '{}' in suite '{}'", id, suite),
        None => anyhow!("suite '{}' has no runs", suite),
    })?;
    let previous = history::previous_of(entries, index)
        .ok_or_else(|| anyhow!("run {} has no earlier run to compare against", current.short_id()))?;

    let tool = Tool::from(current.tool.as_str());
    let comparison = compare_runs(previous, current, &tool, &opts);
    print_report(suite, &comparison, format);
    Ok(status_of(&comparison, fail_on_alert(config, thresholds)))
}

pub(crate) fn list(config: &Config, target: &Target) -> Result<Status> {
    let data = load_existing(config, target)?;
    println!("{} ({})", data.repo_url, format_millis(data.last_update));
    for (suite, entries) in &data.entries {
        match entries.last() {
            Some(last) => println!(
                "{}: {} runs, latest {} at {} ({} benches)",
                suite,
                entries.len(),
                last.short_id(),
                format_millis(last.date),
                last.benches.len()
            ),
            None => println!("{}: 0 runs", suite),
        }
    }
    Ok(Status::Clean)
}

pub(crate) fn show(config: &Config, target: &Target, bench: &str) -> Result<Status> {
    let data = load_existing(config, target)?;
    let suite = suite_name(config, target);
    suite_entries(&data, suite)?;

    let points = series::series(&data, suite, bench);
    let Some(summary) = series::summarize(&points) else {
        bail!("bench '{}' not found in suite '{}'", bench, suite);
    };
    for point in &points {
        println!("{} {} {} {}", short_commit_id(&point.commit), format_millis(point.date), point.value, point.unit);
    }
    let change = summary
        .change_from_first
        .map(|c| format!("{:+.2}%", c * 100.0))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "runs={} min={} max={} mean={:.4} median={:.4} p95={:.4} latest={} change={}",
        summary.count, summary.min, summary.max, summary.mean, summary.median, summary.p95, summary.latest, change
    );
    Ok(Status::Clean)
}

pub(crate) fn validate(config: &Config, target: &Target) -> Result<Status> {
    let path = data_path(config, target);
    let data = load_existing(config, target)?;
    let issues = shape::validate(&data);
    if issues.is_empty() {
        println!(
            "{}: ok ({} suites, {} runs)",
            path.display(),
            data.entries.len(),
            data.total_entries()
        );
        return Ok(Status::Clean);
    }
    for issue in &issues {
        println!("{}", issue);
    }
    eprintln!("{}: {} issue(s)", path.display(), issues.len());
    Ok(Status::Failed)
}

pub(crate) fn export(config: &Config, target: &Target, format: ExportFormat, output: Option<&Path>) -> Result<Status> {
    let data = load_existing(config, target)?;
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &data).context("write JSON export")?;
            writeln!(writer)?;
            writer.flush()?;
        }
        ExportFormat::Csv => report::write_csv(&mut writer, &data).context("write CSV export")?,
    }
    Ok(Status::Clean)
}

fn load_existing(config: &Config, target: &Target) -> Result<BenchmarkData> {
    store::load(&data_path(config, target), None)
}

fn suite_entries<'a>(data: &'a BenchmarkData, suite: &str) -> Result<&'a [Entry]> {
    data.suite(suite).ok_or_else(|| {
        let known: Vec<&str> = data.suite_names().collect();
        anyhow!("suite '{}' not found (known: {})", suite, known.join(", "))
    })
}

fn format_millis(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| millis.to_string())
}
