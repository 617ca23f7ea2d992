//! Runtime configuration: data locations, source column names and render settings.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration. Command line flags override individual fields.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::{color::{Gradient, Rgb}, rate::RateMode, render::Style};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding downloaded source data.
    pub data_dir: PathBuf,
    pub cases: CasesConfig,
    pub shapes: ShapesConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cases: CasesConfig::default(),
            shapes: ShapesConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

/// Daily case counts per municipality.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CasesConfig {
    pub url: String,
    /// File name inside `data_dir`.
    pub file_name: String,
    pub separator: char,
    pub date_column: String,
    pub name_column: String,
    pub count_column: String,
    /// chrono format of the date column.
    pub date_format: String,
}

impl Default for CasesConfig {
    fn default() -> Self {
        Self {
            url: "https://data.rivm.nl/covid-19/COVID-19_aantallen_gemeente_per_dag.csv".into(),
            file_name: "COVID-19_aantallen_gemeente_per_dag.csv".into(),
            separator: ';',
            date_column: "Date_of_publication".into(),
            name_column: "Municipality_name".into(),
            count_column: "Total_reported".into(),
            date_format: "%Y-%m-%d".into(),
        }
    }
}

/// Municipal boundaries with inhabitant counts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShapesConfig {
    pub url: String,
    /// Directory inside `data_dir` the archive is extracted to.
    pub dir_name: String,
    /// Case-insensitive fragment of the municipal `.shp` file name.
    pub shp_match: String,
    pub name_field: String,
    pub population_field: String,
    /// Attribute flagging water polygons; `None` keeps every record.
    pub water_field: Option<String>,
    /// Values of `water_field` that mark land.
    pub land_values: Vec<String>,
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self {
            url: "https://www.cbs.nl/-/media/cbs/dossiers/nederland-regionaal/wijk-en-buurtstatistieken/wijkbuurtkaart_2020_v1.zip".into(),
            dir_name: "wijkbuurtkaart_2020".into(),
            shp_match: "gemeente_2020".into(),
            name_field: "GM_NAAM".into(),
            population_field: "AANT_INW".into(),
            water_field: Some("WATER".into()),
            land_values: vec!["NEE".into(), "no".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output image; `.svg` writes SVG, anything else PNG. Overwritten on each render.
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub title_height: u32,
    pub font_size: u32,
    pub gradient: Gradient,
    pub rate_mode: RateMode,
    pub missing_color: Rgb,
    pub placeholder_color: Rgb,
    pub border_color: Rgb,
    pub border_width: u32,
    pub background: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let style = Style::default();
        Self {
            output: PathBuf::from("covid_map.png"),
            width: 800,
            height: 900,
            margin: 20,
            title_height: 40,
            font_size: 22,
            gradient: Gradient::default(),
            rate_mode: RateMode::default(),
            missing_color: style.missing,
            placeholder_color: style.placeholder,
            border_color: style.border,
            border_width: style.border_width,
            background: style.background,
        }
    }
}

impl RenderConfig {
    pub fn style(&self) -> Style {
        Style {
            missing: self.missing_color,
            placeholder: self.placeholder_color,
            border: self.border_color,
            border_width: self.border_width,
            background: self.background,
        }
    }
}

impl Config {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("[config] Failed to read {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("[config] Invalid configuration in {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.cases.separator.is_ascii(), "[config] CSV separator must be ASCII, got {:?}", self.cases.separator);
        ensure!(self.render.width > 0 && self.render.height > 0, "[config] canvas size must be positive");
        Ok(())
    }

    /// Location of the case CSV.
    pub fn cases_path(&self) -> PathBuf { self.data_dir.join(&self.cases.file_name) }

    /// Directory the shape archive is extracted to.
    pub fn shapes_dir(&self) -> PathBuf { self.data_dir.join(&self.shapes.dir_name) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = Config::from_json_str("{}").unwrap();
        assert_eq!(config.cases.separator, ';');
        assert_eq!(config.shapes.name_field, "GM_NAAM");
        assert_eq!(config.render.gradient, Gradient::Viridis);
        assert_eq!(config.render.style(), Style::default());
        assert_eq!(config.cases_path(), PathBuf::from("data/COVID-19_aantallen_gemeente_per_dag.csv"));
    }

    #[test]
    fn partial_override() {
        let config = Config::from_json_str(r##"{
            "data_dir": "/tmp/data",
            "cases": { "separator": "," },
            "render": { "gradient": "Inferno", "rate_mode": "rounded", "missing_color": "#808080", "width": 400 }
        }"##).unwrap();
        assert_eq!(config.cases.separator, ',');
        assert_eq!(config.cases.date_column, "Date_of_publication");
        assert_eq!(config.render.gradient, Gradient::Inferno);
        assert_eq!(config.render.rate_mode, RateMode::Rounded);
        assert_eq!(config.render.missing_color, Rgb::from_u32(0x808080));
        assert_eq!(config.render.width, 400);
        assert_eq!(config.render.height, 900);
        assert_eq!(config.shapes_dir(), PathBuf::from("/tmp/data/wijkbuurtkaart_2020"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(Config::from_json_str(r#"{ "render": { "gradient": "rainbow" } }"#).is_err());
        assert!(Config::from_json_str(r#"{ "render": { "border_color": "grey" } }"#).is_err());
        assert!(Config::from_json_str(r#"{ "cases": { "separator": "§" } }"#).is_err());
        assert!(Config::from_json_str(r#"{ "render": { "width": 0 } }"#).is_err());
    }
}
