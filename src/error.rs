//! Typed failures of the core pipeline.

use thiserror::Error;

/// Errors that abort a single render call.
///
/// Join-time and population-time problems never show up here: they degrade the
/// affected municipality to "missing" and are only logged.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    /// Nothing to normalize or draw.
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),

    /// A source collection holds no usable rows.
    #[error("empty dataset: {0}")]
    EmptyDataset(&'static str),

    /// A value that cannot be placed on a color scale (NaN or infinite).
    #[error("non-finite value {value} at position {index}")]
    NonFinite { index: usize, value: f64 },

    /// Gradient name not present in the registry.
    #[error("unknown gradient {name:?} (expected one of: {known})")]
    UnknownGradient { name: String, known: String },

    /// A date range whose lower bound lies after its upper bound.
    #[error("invalid date range: {min} is after {max}")]
    InvalidRange { min: chrono::NaiveDate, max: chrono::NaiveDate },
}
