use crate::bench_stats::{parse_extra, parse_range};
use crate::compare::{BenchComparison, Comparison, Verdict};
use crate::model::{BenchmarkData, short_commit_id};
use std::fmt::Write as _;
use std::io::{self, Write};

/// Markdown table in the layout of a commit comment: one row per bench.
pub fn render_markdown(suite: &str, comparison: &Comparison) -> String {
    let mut out = String::new();
    let alerts = comparison.alerts().count();
    if alerts > 0 {
        let _ = writeln!(out, "# :warning: **Performance Alert** :warning:\n");
        let _ = writeln!(
            out,
            "Possible performance regression was detected for benchmark **'{}'**.",
            suite
        );
        let _ = writeln!(
            out,
            "Benchmark result of this commit is worse than the previous benchmark result exceeding threshold `{}`.\n",
            comparison.options.alert
        );
    } else {
        let _ = writeln!(out, "# {}\n", suite);
    }

    let _ = writeln!(
        out,
        "| Benchmark suite | Current: {} | Previous: {} | Ratio |",
        short_commit_id(&comparison.current_commit),
        short_commit_id(&comparison.previous_commit)
    );
    let _ = writeln!(out, "|-|-|-|-|");
    for row in &comparison.rows {
        let _ = writeln!(
            out,
            "| `{}` | {} | {} | {} |",
            row.name,
            format_value(row.current, &row.unit, row.current_range.as_deref()),
            match row.previous {
                Some(previous) => format_value(
                    previous,
                    row.previous_unit.as_deref().unwrap_or(&row.unit),
                    row.previous_range.as_deref()
                ),
                None => "-".to_string(),
            },
            format_ratio(row)
        );
    }

    if !comparison.removed.is_empty() {
        let _ = writeln!(out, "\nNo longer measured: {}", comparison.removed.join(", "));
    }
    out
}

/// One line per bench, followed by a summary line.
pub fn render_text(comparison: &Comparison) -> String {
    let mut out = String::new();
    for row in &comparison.rows {
        let _ = write!(out, "{} {}: ", row.verdict.label(), row.name);
        match row.previous {
            Some(previous) => {
                let previous_unit = row.previous_unit.as_deref().unwrap_or(&row.unit);
                let _ = write!(out, "previous={} {} ", previous, previous_unit);
            }
            None => out.push_str("previous=- "),
        }
        let _ = writeln!(out, "current={} {} ratio={}", row.current, row.unit, format_ratio(row));
    }
    for name in &comparison.removed {
        let _ = writeln!(out, "REMOVED {}", name);
    }
    let _ = writeln!(
        out,
        "{} vs {}: {} compared, {} failed, {} alerted, {} improved, {} new (alert {}, fail {})",
        short_commit_id(&comparison.current_commit),
        short_commit_id(&comparison.previous_commit),
        comparison.rows.len(),
        comparison.count(Verdict::Fail),
        comparison.count(Verdict::Alert),
        comparison.count(Verdict::Improved),
        comparison.count(Verdict::New),
        comparison.options.alert,
        comparison.options.fail
    );
    out
}

/// Flat export of every bench in every suite.
pub fn write_csv<W: Write>(writer: &mut W, data: &BenchmarkData) -> io::Result<()> {
    writeln!(writer, "suite,commit,date,name,value,unit,stddev,rounds")?;
    for (suite, entries) in &data.entries {
        for entry in entries {
            for bench in &entry.benches {
                let stddev = bench.range.as_deref().and_then(parse_range);
                let rounds = bench.extra.as_deref().map(parse_extra).and_then(|e| e.rounds);
                writeln!(
                    writer,
                    "{},{},{},{},{},{},{},{}",
                    csv_field(suite),
                    csv_field(&entry.commit.id),
                    entry.date,
                    csv_field(&bench.name),
                    bench.value,
                    csv_field(&bench.unit),
                    stddev.map(|v| v.to_string()).unwrap_or_default(),
                    rounds.map(|v| v.to_string()).unwrap_or_default()
                )?;
            }
        }
    }
    writer.flush()
}

fn format_value(value: f64, unit: &str, range: Option<&str>) -> String {
    match range {
        Some(range) => format!("`{}` {} (`{}`)", value, unit, range),
        None => format!("`{}` {}", value, unit),
    }
}

fn format_ratio(row: &BenchComparison) -> String {
    match row.ratio {
        Some(ratio) if ratio.is_infinite() => "inf".to_string(),
        Some(ratio) => format!("{:.2}", ratio),
        None => "-".to_string(),
    }
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
