//! Benchmark history ingestion and regression detection.
//!
//! The history lives in the `data.js` file a benchmark dashboard renders:
//! suites of runs, one run per commit. This crate reads and writes that file,
//! converts raw tool output into runs, and compares each run against the one
//! before it.

pub mod bench_stats;
pub mod codec;
pub mod compare;
pub mod config;
pub mod history;
pub mod ingest;
pub mod model;
pub mod report;
pub mod series;
pub mod store;
pub mod tool;
pub mod validate;

pub use model::{Bench, BenchmarkData, Commit, Entry, Person};
pub use tool::{Direction, Tool};
