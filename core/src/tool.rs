use std::fmt;
use std::str::FromStr;

/// Producer of a benchmark run, as recorded in `Entry::tool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tool {
    Pytest,
    Cargo,
    Go,
    BenchmarkJs,
    CustomBiggerIsBetter,
    CustomSmallerIsBetter,
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    BiggerIsBetter,
    SmallerIsBetter,
}

impl Tool {
    pub fn as_str(&self) -> &str {
        match self {
            Tool::Pytest => "pytest",
            Tool::Cargo => "cargo",
            Tool::Go => "go",
            Tool::BenchmarkJs => "benchmarkjs",
            Tool::CustomBiggerIsBetter => "customBiggerIsBetter",
            Tool::CustomSmallerIsBetter => "customSmallerIsBetter",
            Tool::Other(name) => name,
        }
    }

    /// Which way an improvement moves the value for a bench in `unit`.
    pub fn direction(&self, unit: &str) -> Direction {
        match self {
            Tool::CustomBiggerIsBetter => Direction::BiggerIsBetter,
            Tool::CustomSmallerIsBetter => Direction::SmallerIsBetter,
            _ if is_throughput_unit(unit) => Direction::BiggerIsBetter,
            _ => Direction::SmallerIsBetter,
        }
    }
}

fn is_throughput_unit(unit: &str) -> bool {
    let unit = unit.trim();
    matches!(unit, "iter/sec" | "ops/sec" | "ops/s" | "req/s") || unit.ends_with("/sec") || unit.ends_with("/s")
}

impl FromStr for Tool {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pytest" => Tool::Pytest,
            "cargo" => Tool::Cargo,
            "go" => Tool::Go,
            "benchmarkjs" => Tool::BenchmarkJs,
            "customBiggerIsBetter" => Tool::CustomBiggerIsBetter,
            "customSmallerIsBetter" => Tool::CustomSmallerIsBetter,
            other => Tool::Other(other.to_string()),
        })
    }
}

impl From<&str> for Tool {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(tool) => tool,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
