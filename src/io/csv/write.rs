//! CSV writing operations.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{CsvWriter, NamedFrom}, series::Series};

use crate::{common, types::JoinedRecord};

/// Write a DataFrame to a CSV file.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::csv::write] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[io::csv::write] Failed to write CSV to {:?}", path))
}

/// Tabulate joined records as `name,population,cases,rate`. Missing values are null.
pub(crate) fn joined_dataframe(records: &[JoinedRecord]) -> Result<DataFrame> {
    let names = records.iter().map(|r| r.name.clone()).collect::<Vec<_>>();
    let populations = records.iter().map(|r| r.population).collect::<Vec<_>>();
    let cases = records.iter().map(|r| r.case_count).collect::<Vec<_>>();
    let rates = records.iter().map(|r| r.rate).collect::<Vec<_>>();

    Ok(DataFrame::new(vec![
        Series::new("name".into(), names).into(),
        Series::new("population".into(), populations).into(),
        Series::new("cases".into(), cases).into(),
        Series::new("rate".into(), rates).into(),
    ])?)
}

/// Write the joined table for one date to `path`, replacing it atomically.
pub(crate) fn write_joined_csv(records: &[JoinedRecord], path: &Path) -> Result<()> {
    let mut df = joined_dataframe(records)?;
    common::write_atomically(path, |tmp| write_csv(&mut df, tmp))
}
