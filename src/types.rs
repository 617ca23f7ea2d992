use chrono::NaiveDate;
use geo::MultiPolygon;

/// Reported cases for one municipality on one publication date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub report_date: NaiveDate,
    pub municipality_name: String,
    pub case_count: u64,
}

impl CaseRecord {
    pub fn new(report_date: NaiveDate, municipality_name: impl Into<String>, case_count: u64) -> Self {
        Self { report_date, municipality_name: municipality_name.into(), case_count }
    }
}

/// A land-only municipal boundary with its inhabitant count.
///
/// `population` is kept as read from the source. Values `<= 0` are data errors
/// and are treated as missing when the rate is computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MunicipalityShape {
    pub name: String,
    pub population: i64,
    pub geometry: MultiPolygon<f64>,
}

impl MunicipalityShape {
    pub fn new(name: impl Into<String>, population: i64, geometry: MultiPolygon<f64>) -> Self {
        Self { name: name.into(), population, geometry }
    }
}

/// One municipality joined against the cases of a single date.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub name: String,
    pub population: i64,
    pub case_count: Option<u64>,
    pub geometry: MultiPolygon<f64>,
    /// Cases per 100,000 inhabitants, `None` when no data is available.
    pub rate: Option<f64>,
}

impl JoinedRecord {
    #[inline] pub fn has_rate(&self) -> bool { self.rate.is_some() }
}
