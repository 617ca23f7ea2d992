//! Normalization of a value collection onto [0,1] and mapping through a gradient.

use crate::{color::{Gradient, Rgb}, error::MapError};

/// Normalized value assigned to every element of a constant collection.
pub const CONSTANT_LEVEL: f64 = 0.5;

/// Slack accepted by [`map_color`] for values produced by floating point
/// arithmetic just outside [0,1].
const UNIT_TOLERANCE: f64 = 1e-9;

/// Rescale `values` to [0,1] using the minimum and maximum of the whole
/// collection: `(x - min) / (max - min)`.
///
/// A constant collection maps every element to [`CONSTANT_LEVEL`].
/// Length and order are preserved.
pub fn normalize(values: &[f64]) -> Result<Vec<f64>, MapError> {
    if values.is_empty() {
        return Err(MapError::DegenerateInput("cannot normalize an empty sequence"))
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(MapError::NonFinite { index, value })
    }

    let (min, max) = values.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if max == min {
        return Ok(vec![CONSTANT_LEVEL; values.len()])
    }

    let range = max - min;
    Ok(values.iter().map(|&v| (v - min) / range).collect())
}

/// Look up the gradient color for a normalized value.
///
/// # Panics
/// If `t` is NaN or lies outside [0,1]. That can only come from a bug in
/// [`normalize`] or its caller.
pub fn map_color(t: f64, gradient: Gradient) -> Rgb {
    assert!(
        t >= -UNIT_TOLERANCE && t <= 1.0 + UNIT_TOLERANCE,
        "[color::map_color] normalized value {t} outside [0,1]",
    );
    gradient.at(t.clamp(0.0, 1.0))
}

/// Normalize `values` over the whole collection, then map each through `gradient`.
///
/// Only values that are actually present may be passed here; missing entries
/// must be filtered out by the caller so they do not distort the scale.
pub fn colorize(values: &[f64], gradient: Gradient) -> Result<Vec<Rgb>, MapError> {
    Ok(normalize(values)?
        .into_iter()
        .map(|t| map_color(t, gradient))
        .collect())
}
