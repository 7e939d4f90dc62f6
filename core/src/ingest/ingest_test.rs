use super::*;
use crate::bench_stats::{TimeUnit, parse_extra, parse_range};

const PYTEST_REPORT: &str = r#"{
  "machine_info": {"node": "ci"},
  "benchmarks": [
    {
      "group": null,
      "name": "test_io_dataset_benchmark[mnist]",
      "fullname": "tests/test_io_dataset_eager.py::test_io_dataset_benchmark[mnist]",
      "stats": {
        "min": 0.2, "max": 0.3, "mean": 0.25, "stddev": 0.04,
        "rounds": 5, "median": 0.24, "ops": 4.0
      }
    },
    {
      "name": "test_plain",
      "stats": {"mean": 0.0005, "stddev": 0.00001, "rounds": 100}
    }
  ],
  "datetime": "2021-01-18T20:47:47.000000",
  "version": "3.2.3"
}"#;

#[test]
fn test_pytest_report_uses_fullname_and_ops() {
    let benches = ingest(&Tool::Pytest, PYTEST_REPORT).expect("pytest report");
    assert_eq!(benches.len(), 2);

    let mnist = &benches[0];
    assert_eq!(mnist.name, "tests/test_io_dataset_eager.py::test_io_dataset_benchmark[mnist]");
    assert_eq!(mnist.unit, "iter/sec");
    assert_eq!(mnist.value, 4.0);
    assert_eq!(mnist.range.as_deref(), Some("stddev: 0.04"));
    assert_eq!(mnist.extra.as_deref(), Some("mean: 250 msec\nrounds: 5"));
}

#[test]
fn test_pytest_without_ops_derives_from_mean() {
    let benches = parse_pytest(PYTEST_REPORT).expect("pytest report");
    let plain = &benches[1];
    assert_eq!(plain.name, "test_plain");
    assert!((plain.value - 2000.0).abs() < 1e-9);

    let extra = parse_extra(plain.extra.as_deref().unwrap_or_default());
    assert_eq!(extra.mean.map(|q| q.unit), Some(TimeUnit::Usec));
    assert_eq!(extra.rounds, Some(100));
}

#[test]
fn test_pytest_rejects_malformed_report() {
    let err = parse_pytest("{\"benchmarks\": 3}").expect_err("benchmarks must be a list");
    assert!(err.to_string().contains("pytest-benchmark"));
}

#[test]
fn test_cargo_bencher_lines() {
    let output = "\
running 3 tests
test parse::small   ... bench:       1,234 ns/iter (+/- 56)
test parse::large   ... bench:   9,876,543 ns/iter (+/- 12,000)
test ignored_case ... ignored

test result: ok. 0 passed; 0 failed; 1 ignored; 2 measured
";
    let benches = ingest(&Tool::Cargo, output).expect("cargo output");
    assert_eq!(benches.len(), 2);
    assert_eq!(benches[0].name, "parse::small");
    assert_eq!(benches[0].value, 1234.0);
    assert_eq!(benches[0].unit, "ns/iter");
    assert_eq!(benches[0].range.as_deref(), Some("± 56"));
    assert_eq!(parse_range(benches[1].range.as_deref().unwrap_or_default()), Some(12_000.0));
}

#[test]
fn test_cargo_bad_value_names_line() {
    let err = parse_cargo("test broken ... bench: fast ns/iter").expect_err("non-numeric");
    assert!(format!("{:#}", err).contains("line 1"));
}

#[test]
fn test_custom_json_array() {
    let text = r#"[
        {"name": "throughput", "value": 512.5, "unit": "req/s", "extra": "workers: 4"},
        {"name": "latency", "value": 3.2, "unit": "ms", "range": "± 0.1"}
    ]"#;
    let benches = ingest(&Tool::CustomBiggerIsBetter, text).expect("custom json");
    assert_eq!(benches[0].extra.as_deref(), Some("workers: 4"));
    assert_eq!(benches[1].range.as_deref(), Some("± 0.1"));
}

#[test]
fn test_ingest_rejects_empty_and_duplicates() {
    let err = ingest(&Tool::Cargo, "running 0 tests\n").expect_err("no results");
    assert!(err.to_string().contains("no benchmark results"));

    let dup = r#"[{"name":"a","value":1,"unit":"ms"},{"name":"a","value":2,"unit":"ms"}]"#;
    let err = ingest(&Tool::CustomSmallerIsBetter, dup).expect_err("duplicate names");
    assert!(err.to_string().contains("duplicate benchmark name 'a'"));
}

#[test]
fn test_ingest_rejects_unsupported_tool() {
    let err = ingest(&Tool::Go, "").expect_err("go is not ingested");
    assert!(err.to_string().contains("'go' is not supported"));
}
