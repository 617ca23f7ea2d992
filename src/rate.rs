//! Cases per 100,000 inhabitants.

use clap::ValueEnum;
use serde::Deserialize;

/// Inhabitant base the rate is expressed against.
pub const PER_INHABITANTS: f64 = 100_000.0;

/// How rates are presented on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RateMode {
    /// Plain floating point, no rounding.
    #[default]
    Exact,
    /// Rounded to the nearest whole number of cases per 100k.
    Rounded,
}

/// Compute `case_count * 100000 / population`.
///
/// Returns `None` when the count is absent or the population is not positive.
/// The caller is responsible for logging the latter case.
pub fn cases_per_100k(case_count: Option<u64>, population: i64) -> Option<f64> {
    if population <= 0 { return None }
    case_count.map(|cases| cases as f64 * PER_INHABITANTS / population as f64)
}

impl RateMode {
    /// Apply the presentation variant to an exact rate.
    #[inline]
    pub fn apply(self, rate: f64) -> f64 {
        match self {
            Self::Exact => rate,
            Self::Rounded => rate.round(),
        }
    }

    pub fn rate(self, case_count: Option<u64>, population: i64) -> Option<f64> {
        cases_per_100k(case_count, population).map(|rate| self.apply(rate))
    }
}
