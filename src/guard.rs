//! Validation of a requested report date against the available data range.

use std::fmt;

use chrono::NaiveDate;

use crate::error::MapError;

/// Inclusive range of dates for which case data exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    min: NaiveDate,
    max: NaiveDate,
}

/// Outcome of [`DateRange::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCheck {
    /// Proceed with join and render.
    Valid,
    /// Render the placeholder map instead.
    OutOfRange,
}

impl DateRange {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Result<Self, MapError> {
        if min > max { return Err(MapError::InvalidRange { min, max }) }
        Ok(Self { min, max })
    }

    #[inline] pub fn min(&self) -> NaiveDate { self.min }

    #[inline] pub fn max(&self) -> NaiveDate { self.max }

    /// Both bounds are inclusive.
    pub fn check(&self, date: NaiveDate) -> DateCheck {
        if self.min <= date && date <= self.max { DateCheck::Valid } else { DateCheck::OutOfRange }
    }

    /// Widen the range so it covers `date`.
    pub fn extend(&mut self, date: NaiveDate) {
        self.min = self.min.min(date);
        self.max = self.max.max(date);
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.min, self.max)
    }
}
