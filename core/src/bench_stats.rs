//! Structured view over the free-form `range` and `extra` strings stored with
//! each bench.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Sec,
    Msec,
    Usec,
    Nsec,
}

impl TimeUnit {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "sec" | "s" => Some(TimeUnit::Sec),
            "msec" | "ms" => Some(TimeUnit::Msec),
            "usec" | "us" | "µs" => Some(TimeUnit::Usec),
            "nsec" | "ns" => Some(TimeUnit::Nsec),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Sec => "sec",
            TimeUnit::Msec => "msec",
            TimeUnit::Usec => "usec",
            TimeUnit::Nsec => "nsec",
        }
    }

    fn nanos_per_unit(self) -> f64 {
        match self {
            TimeUnit::Sec => 1e9,
            TimeUnit::Msec => 1e6,
            TimeUnit::Usec => 1e3,
            TimeUnit::Nsec => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: TimeUnit,
}

impl Quantity {
    pub fn to_nanos(&self) -> f64 {
        self.value * self.unit.nanos_per_unit()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraStats {
    pub mean: Option<Quantity>,
    pub rounds: Option<u64>,
    /// Any other `key: value` lines, in order.
    pub other: Vec<(String, String)>,
}

/// Pick the largest unit in which `seconds` is still at least one.
pub fn human_duration(seconds: f64) -> Quantity {
    let (value, unit) = if seconds < 1e-6 {
        (seconds * 1e9, TimeUnit::Nsec)
    } else if seconds < 1e-3 {
        (seconds * 1e6, TimeUnit::Usec)
    } else if seconds < 1.0 {
        (seconds * 1e3, TimeUnit::Msec)
    } else {
        (seconds, TimeUnit::Sec)
    };
    Quantity { value, unit }
}

/// Parse the spread stored in `range`: `stddev: X`, `± X` or `+/- X`.
pub fn parse_range(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = if let Some(rest) = trimmed.strip_prefix("stddev:") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix('±') {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("+/-") {
        rest
    } else {
        return None;
    };
    parse_number(number.split_whitespace().next()?)
}

pub fn parse_extra(raw: &str) -> ExtraStats {
    let mut stats = ExtraStats::default();
    for line in raw.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "mean" => stats.mean = parse_quantity(value),
            "rounds" => stats.rounds = value.parse().ok(),
            _ => stats.other.push((key.to_string(), value.to_string())),
        }
    }
    stats
}

fn parse_quantity(raw: &str) -> Option<Quantity> {
    let mut parts = raw.split_whitespace();
    let value = parse_number(parts.next()?)?;
    let unit = TimeUnit::parse(parts.next()?)?;
    Some(Quantity { value, unit })
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse().ok().filter(|v: &f64| v.is_finite())
}
