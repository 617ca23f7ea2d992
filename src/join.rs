//! Left join of municipal shapes against the case counts of one date.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::{rate::RateMode, types::{CaseRecord, JoinedRecord, MunicipalityShape}};

/// Join `shapes` against the records of `cases` published on `date`.
///
/// Produces exactly one [`JoinedRecord`] per shape, in input order. Names are
/// matched exactly (case-sensitive). Shapes without a matching record, or with a
/// non-positive population, get `rate = None`. Case records that match no shape
/// are dropped and logged.
pub fn join<'a>(
    shapes: &[MunicipalityShape],
    cases: impl IntoIterator<Item = &'a CaseRecord>,
    date: NaiveDate,
    mode: RateMode,
) -> Vec<JoinedRecord> {
    let mut by_name: HashMap<&str, u64> = HashMap::new();
    for record in cases.into_iter().filter(|record| record.report_date == date) {
        // Upstream aggregation makes names unique per date; summing keeps us correct if it did not.
        *by_name.entry(record.municipality_name.as_str()).or_default() += record.case_count;
    }

    let shape_names: HashSet<&str> = shapes.iter().map(|shape| shape.name.as_str()).collect();
    let mut orphans = by_name.keys()
        .filter(|name| !shape_names.contains(*name))
        .copied()
        .collect::<Vec<_>>();
    if !orphans.is_empty() {
        orphans.sort_unstable();
        log::warn!(
            "[join] {} case record(s) on {date} match no municipality: {}",
            orphans.len(),
            orphans.join(", "),
        );
    }

    shapes.iter()
        .map(|shape| {
            let case_count = by_name.get(shape.name.as_str()).copied();
            if shape.population <= 0 {
                log::warn!(
                    "[join] municipality {:?} has invalid population {}; treating as missing",
                    shape.name, shape.population,
                );
            } else if case_count.is_none() {
                log::debug!("[join] no case record for {:?} on {date}", shape.name);
            }

            JoinedRecord {
                name: shape.name.clone(),
                population: shape.population,
                case_count,
                geometry: shape.geometry.clone(),
                rate: mode.rate(case_count, shape.population),
            }
        })
        .collect()
}
