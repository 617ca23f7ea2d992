//! IO module for format-specific reading and writing operations.
//!
//! - `csv` - delimited tabular input (case counts) and export of joined tables
//! - `png` - raster canvas for choropleth output
//! - `svg` - vector canvas for choropleth output

pub(crate) mod csv;
pub(crate) mod png;
pub(crate) mod svg;
