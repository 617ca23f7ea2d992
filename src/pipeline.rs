//! Request/response entry point: one call to [`Pipeline::render`] per requested
//! (date, gradient) pair, over source data loaded once into a [`Dataset`].

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::{
    color::Gradient,
    common,
    config::{Config, RenderConfig},
    data::{self, CaseTable},
    error::MapError,
    guard::{DateCheck, DateRange},
    io,
    join::join,
    render::{self, ChoroplethMap},
    types::{JoinedRecord, MunicipalityShape},
};

/// Immutable source collections shared by every render call.
#[derive(Debug, Clone)]
pub struct Dataset {
    shapes: Vec<MunicipalityShape>,
    cases: CaseTable,
    range: Option<DateRange>,
}

impl Dataset {
    /// Fails when there is no municipality to draw. An empty case table is
    /// accepted; every date is then out of range.
    pub fn new(shapes: Vec<MunicipalityShape>, cases: CaseTable) -> Result<Self, MapError> {
        if shapes.is_empty() {
            return Err(MapError::EmptyDataset("no land municipalities"))
        }
        let range = cases.date_range();
        if range.is_none() {
            log::warn!("[pipeline] case table is empty; only the placeholder map can be drawn");
        }
        Ok(Self { shapes, cases, range })
    }

    /// Load shapes and case counts from the locations named in `config`.
    pub fn load(config: &Config) -> Result<Self> {
        let cases_path = config.cases_path();
        common::require_file_exists(&cases_path)?;
        let shp_path = common::find_shapefile(&config.shapes_dir(), &config.shapes.shp_match)
            .context("[pipeline] Municipal shapefile not found (run `covidmap download` first?)")?;

        log::info!("[pipeline] loading shapes from {}", shp_path.display());
        let shapes = data::load_municipalities(&shp_path, &config.shapes)?;

        log::info!("[pipeline] loading case counts from {}", cases_path.display());
        let cases = CaseTable::read_csv(&cases_path, &config.cases)?;

        Ok(Self::new(shapes, cases)?)
    }

    #[inline] pub fn shapes(&self) -> &[MunicipalityShape] { &self.shapes }

    #[inline] pub fn cases(&self) -> &CaseTable { &self.cases }

    /// Dates with case data, `None` if there are none.
    #[inline] pub fn range(&self) -> Option<DateRange> { self.range }
}

/// Title of the map for a valid date.
pub fn map_title(date: NaiveDate) -> String {
    format!("COVID-19 cases per 100,000 inhabitants, {date}")
}

/// Title of the placeholder map.
pub fn placeholder_title(range: Option<DateRange>) -> String {
    match range {
        Some(range) => format!("Select a date between {} and {}", range.min(), range.max()),
        None => "Select a valid date".to_string(),
    }
}

/// Renders maps of a [`Dataset`] with fixed render settings.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    dataset: &'a Dataset,
    config: &'a RenderConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(dataset: &'a Dataset, config: &'a RenderConfig) -> Self {
        Self { dataset, config }
    }

    #[inline] pub fn dataset(&self) -> &'a Dataset { self.dataset }

    /// Whether `date` has data. Without any case data every date is out of range.
    pub fn check(&self, date: NaiveDate) -> DateCheck {
        self.dataset.range.map_or(DateCheck::OutOfRange, |range| range.check(date))
    }

    /// Left join of all municipalities against the counts of `date`.
    pub fn joined(&self, date: NaiveDate) -> Vec<JoinedRecord> {
        join(&self.dataset.shapes, self.dataset.cases.on(date), date, self.config.rate_mode)
    }

    /// Build the map for `date`: the choropleth when the date has data, the
    /// placeholder map otherwise.
    pub fn build(&self, date: NaiveDate, gradient: Gradient) -> Result<ChoroplethMap, MapError> {
        match self.check(date) {
            DateCheck::Valid => {
                let records = self.joined(date);
                render::choropleth(&records, gradient, self.config.style(), map_title(date))
            }
            DateCheck::OutOfRange => {
                log::info!("[pipeline] {date} is outside the data range; drawing placeholder");
                self.placeholder()
            }
        }
    }

    /// Every municipality in the neutral color, titled with the valid range.
    pub fn placeholder(&self) -> Result<ChoroplethMap, MapError> {
        render::placeholder(&self.dataset.shapes, self.config.style(), placeholder_title(self.dataset.range))
    }

    /// Render `date` with the gradient named `gradient_name` to the configured output.
    ///
    /// An unknown gradient name fails before anything is written.
    pub fn render(&self, date: NaiveDate, gradient_name: &str) -> Result<ChoroplethMap> {
        let gradient = gradient_name.parse::<Gradient>()?;
        self.render_to(date, gradient, &self.config.output)
    }

    /// Render `date` to `path`: SVG for a `.svg` path, PNG for anything else.
    pub fn render_to(&self, date: NaiveDate, gradient: Gradient, path: &Path) -> Result<ChoroplethMap> {
        let map = self.build(date, gradient)
            .with_context(|| format!("[pipeline] Failed to build map for {date}"))?;
        map.save(path, self.config)?;
        Ok(map)
    }

    /// Write the joined table of `date` as CSV (`name,population,cases,rate`).
    ///
    /// Returns `false` without writing anything when `date` is out of range.
    pub fn export_csv(&self, date: NaiveDate, path: &Path) -> Result<bool> {
        if self.check(date) == DateCheck::OutOfRange {
            log::warn!("[pipeline] {date} is outside the data range; not exporting {}", path.display());
            return Ok(false)
        }

        let records = self.joined(date);
        io::csv::write_joined_csv(&records, path)
            .with_context(|| format!("[pipeline] Failed to export joined table to {}", path.display()))?;
        log::info!("[pipeline] wrote joined table ({} rows) to {}", records.len(), path.display());
        Ok(true)
    }
}
