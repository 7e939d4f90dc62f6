use anyhow::{Context, Result, bail};
use std::fmt;
use std::str::FromStr;

/// Worsening ratio above which a bench is flagged, e.g. `200%` = twice as bad.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Threshold(f64);

impl Threshold {
    pub const DEFAULT: Threshold = Threshold(2.0);

    pub fn new(ratio: f64) -> Result<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            bail!("threshold must be a positive ratio, got {}", ratio);
        }
        Ok(Self(ratio))
    }

    /// Accepts `200%`, `2` or `2x`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let ratio = if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent
                .trim()
                .parse()
                .with_context(|| format!("invalid percentage threshold '{}'", raw))?;
            value / 100.0
        } else {
            let number = trimmed.strip_suffix(['x', 'X']).unwrap_or(trimmed).trim();
            number
                .parse()
                .with_context(|| format!("invalid ratio threshold '{}'", raw))?
        };
        Self::new(ratio)
    }

    pub fn ratio(self) -> f64 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Threshold {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let percent = (self.0 * 10_000.0).round() / 100.0;
        write!(f, "{}%", percent)
    }
}
