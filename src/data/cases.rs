use std::{collections::{BTreeMap, HashMap}, ops::Range, path::Path};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use polars::frame::DataFrame;

use crate::{config::CasesConfig, guard::DateRange, io, types::CaseRecord};

/// Aggregated case counts, at most one record per (date, municipality).
///
/// Records are sorted by date, then name. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseTable {
    records: Vec<CaseRecord>,
    by_date: BTreeMap<NaiveDate, Range<usize>>,
}

impl CaseTable {
    /// Build a table, summing records that share date and municipality.
    pub fn from_records(records: impl IntoIterator<Item = CaseRecord>) -> Self {
        let mut totals: BTreeMap<(NaiveDate, String), u64> = BTreeMap::new();
        for record in records {
            *totals.entry((record.report_date, record.municipality_name)).or_default() += record.case_count;
        }

        let records = totals.into_iter()
            .map(|((report_date, municipality_name), case_count)| CaseRecord { report_date, municipality_name, case_count })
            .collect::<Vec<_>>();

        let mut by_date: BTreeMap<NaiveDate, Range<usize>> = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            by_date.entry(record.report_date)
                .and_modify(|range| range.end = i + 1)
                .or_insert(i..i + 1);
        }

        Self { records, by_date }
    }

    /// Read the case CSV described by `config` from `path`.
    pub fn read_csv(path: &Path, config: &CasesConfig) -> Result<Self> {
        let df = io::csv::read_csv_strings(path, config.separator as u8)?;
        Self::from_dataframe(&df, config)
            .with_context(|| format!("[data::cases] Failed to load case counts from {}", path.display()))
    }

    /// Same as [`read_csv`](Self::read_csv), from an in-memory buffer.
    pub fn read_csv_bytes(bytes: &[u8], config: &CasesConfig) -> Result<Self> {
        let df = io::csv::read_csv_strings_bytes(bytes, config.separator as u8)?;
        Self::from_dataframe(&df, config)
    }

    /// Build from a string-typed DataFrame. Rows with an empty or unparseable
    /// date, name or count are dropped, as are negative counts.
    fn from_dataframe(df: &DataFrame, config: &CasesConfig) -> Result<Self> {
        let column = |name: &str| {
            df.column(name)
                .with_context(|| format!("[data::cases] missing column {:?}", name))
        };
        let dates = column(&config.date_column)?.str()?;
        let names = column(&config.name_column)?.str()?;
        let counts = column(&config.count_column)?.str()?;

        let mut dropped = 0usize;
        let records = dates.into_iter()
            .zip(names.into_iter())
            .zip(counts.into_iter())
            .enumerate()
            .filter_map(|(row, ((date, name), count))| {
                let record = parse_row(date, name, count, &config.date_format);
                if record.is_none() {
                    dropped += 1;
                    log::debug!("[data::cases] dropping row {row}: date={date:?} name={name:?} count={count:?}");
                }
                record
            })
            .collect::<Vec<_>>();

        if dropped > 0 {
            log::info!("[data::cases] dropped {dropped} incomplete or invalid row(s)");
        }

        let table = Self::from_records(records);
        log::info!("[data::cases] {} aggregated record(s) over {} date(s)", table.len(), table.by_date.len());
        Ok(table)
    }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    #[inline] pub fn records(&self) -> &[CaseRecord] { &self.records }

    /// Records published on `date`.
    pub fn on(&self, date: NaiveDate) -> &[CaseRecord] {
        match self.by_date.get(&date) {
            Some(range) => &self.records[range.clone()],
            None => &[],
        }
    }

    /// Case count per municipality on `date`.
    pub fn counts_on(&self, date: NaiveDate) -> HashMap<&str, u64> {
        self.on(date).iter()
            .map(|record| (record.municipality_name.as_str(), record.case_count))
            .collect()
    }

    /// All dates with at least one record, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_date.keys().copied()
    }

    /// Earliest and latest publication date, `None` for an empty table.
    pub fn date_range(&self) -> Option<DateRange> {
        let min = *self.by_date.keys().next()?;
        let max = *self.by_date.keys().next_back()?;
        DateRange::new(min, max).ok()
    }
}

fn parse_row(date: Option<&str>, name: Option<&str>, count: Option<&str>, date_format: &str) -> Option<CaseRecord> {
    let date = NaiveDate::parse_from_str(date?.trim(), date_format).ok()?;
    let name = name.map(str::trim).filter(|name| !name.is_empty())?;
    let count = count?.trim().parse::<i64>().ok()?;
    let count = u64::try_from(count).ok()?;
    Some(CaseRecord::new(date, name, count))
}
