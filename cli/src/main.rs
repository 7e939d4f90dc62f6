use std::path::{Component, Path, PathBuf};
use std::sync::Once;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "benchtrail_core=info,benchtrail_cli=info";
const TRACE_ENV: &str = "BENCHTRAIL_LOG";

use clap::{Args, Parser, Subcommand, ValueEnum};

mod commands;
#[cfg(test)]
mod main_test;

use commands::Status;

#[derive(Debug, Parser)]
#[command(
    name = "benchtrail",
    author,
    version,
    about = "Benchmark history and regression detection for dashboard data files",
    long_about = None,
    after_help = "Set BENCHTRAIL_LOG=1 (or a filter such as `benchtrail_core=debug`) for logs on stderr."
)]
struct CliArgs {
    /// Config file (default: ./benchtrail.toml when present)
    #[arg(long, global = true, value_name = "FILE", value_parser = parse_sanitized_path)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// History file and suite selection shared by every command.
#[derive(Debug, Clone, Default, Args)]
struct Target {
    /// History file (`window.BENCHMARK_DATA = ...`)
    #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
    data: Option<PathBuf>,

    /// Benchmark suite name inside the history file
    #[arg(long)]
    suite: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum ReportFormat {
    #[default]
    Text,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Clone, Default, Args)]
struct CommitArgs {
    /// Commit hash of the measured revision (falls back to GITHUB_SHA)
    #[arg(long)]
    commit_id: Option<String>,
    #[arg(long)]
    commit_message: Option<String>,
    /// Commit URL (default: <repo-url>/commit/<id>)
    #[arg(long)]
    commit_url: Option<String>,
    /// Commit timestamp, RFC 3339
    #[arg(long)]
    commit_timestamp: Option<String>,
    #[arg(long)]
    author_name: Option<String>,
    #[arg(long)]
    author_email: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
struct ThresholdArgs {
    /// Worsening ratio that raises an alert, e.g. `200%` or `2`
    #[arg(long)]
    alert_threshold: Option<String>,
    /// Worsening ratio that fails the command (default: alert threshold)
    #[arg(long)]
    fail_threshold: Option<String>,
    /// Exit non-zero on alerts, not only on failures
    #[arg(long)]
    fail_on_alert: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Ingest a tool's output as a new run and compare it with the previous one.
    Append {
        #[command(flatten)]
        target: Target,
        /// Tool output to ingest
        #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
        input: PathBuf,
        /// pytest, cargo, customBiggerIsBetter or customSmallerIsBetter
        #[arg(long)]
        tool: Option<String>,
        /// Repository URL, required when the history file does not exist yet
        #[arg(long)]
        repo_url: Option<String>,
        #[command(flatten)]
        commit: CommitArgs,
        /// Run date, RFC 3339 (default: now)
        #[arg(long)]
        date: Option<String>,
        /// Keep at most N runs in the suite
        #[arg(long)]
        max_items: Option<usize>,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
        /// Compare and report without writing the history file
        #[arg(long)]
        dry_run: bool,
    },
    /// Compare a recorded run (default: latest) with the run before it.
    Compare {
        #[command(flatten)]
        target: Target,
        /// Commit id or prefix of the run to inspect
        #[arg(long)]
        commit: Option<String>,
        #[command(flatten)]
        thresholds: ThresholdArgs,
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// List suites with their run counts.
    List {
        #[command(flatten)]
        target: Target,
    },
    /// Show one bench across the suite's history.
    Show {
        #[command(flatten)]
        target: Target,
        /// Bench name
        #[arg(long)]
        bench: String,
    },
    /// Check the history file for malformed records.
    Validate {
        #[command(flatten)]
        target: Target,
    },
    /// Export the history as plain JSON or CSV.
    Export {
        #[command(flatten)]
        target: Target,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Destination file (default: stdout)
        #[arg(long, value_name = "FILE", value_parser = parse_sanitized_path)]
        output: Option<PathBuf>,
    },
}

fn sanitize_path(raw: &str) -> anyhow::Result<PathBuf> {
    let p = Path::new(raw);

    for comp in p.components() {
        if matches!(comp, Component::ParentDir) {
            return Err(anyhow::anyhow!(
                "Parent directory components ('..') are not allowed in file paths."
            ));
        }
    }

    Ok(p.to_path_buf())
}

fn parse_sanitized_path(raw: &str) -> Result<PathBuf, String> {
    sanitize_path(raw).map_err(|e| e.to_string())
}

fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn maybe_init_tracing() {
    let raw = match std::env::var(TRACE_ENV) {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs { config, command } = CliArgs::parse();
    let cwd = std::env::current_dir()?;
    let config = benchtrail_core::config::Config::discover(config.as_deref(), &cwd)?;

    let status = match command {
        Commands::Append {
            target,
            input,
            tool,
            repo_url,
            commit,
            date,
            max_items,
            thresholds,
            format,
            dry_run,
        } => commands::append(
            &config,
            commands::AppendRequest {
                target,
                input,
                tool,
                repo_url,
                commit,
                date,
                max_items,
                thresholds,
                format,
                dry_run,
            },
        )?,
        Commands::Compare {
            target,
            commit,
            thresholds,
            format,
        } => commands::compare(&config, &target, commit.as_deref(), &thresholds, format)?,
        Commands::List { target } => commands::list(&config, &target)?,
        Commands::Show { target, bench } => commands::show(&config, &target, &bench)?,
        Commands::Validate { target } => commands::validate(&config, &target)?,
        Commands::Export { target, format, output } => commands::export(&config, &target, format, output.as_deref())?,
    };

    if status == Status::Failed {
        std::process::exit(1);
    }
    Ok(())
}
