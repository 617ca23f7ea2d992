use std::{collections::HashSet, path::Path};

use anyhow::{Context, Result, bail};
use shapefile::{Reader, Shape, dbase::{FieldValue, Record}};

use crate::{common, config::ShapesConfig, types::MunicipalityShape};

/// Reads all shapes + attribute records from a given `.shp` file path.
pub fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("[data::shapes] Failed to open shapefile: {}", path.display()))?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("[data::shapes] Error reading shape+record")?;
        items.push((shape, record));
    }
    Ok(items)
}

/// Load land-only municipalities from the shapefile at `path`.
pub fn load_municipalities(path: &Path, config: &ShapesConfig) -> Result<Vec<MunicipalityShape>> {
    let items = read_shapefile(path)?;
    municipalities_from_items(items, config)
        .with_context(|| format!("[data::shapes] Invalid municipal shapefile {}", path.display()))
}

/// Convert shape/record pairs to municipalities, keeping only land records.
///
/// Input order is preserved. Duplicate names among the kept records are an error.
pub fn municipalities_from_items(items: Vec<(Shape, Record)>, config: &ShapesConfig) -> Result<Vec<MunicipalityShape>> {
    let total = items.len();
    let mut seen = HashSet::new();
    let mut shapes = Vec::with_capacity(total);

    for (i, (shape, record)) in items.into_iter().enumerate() {
        if let Some(water_field) = &config.water_field {
            let flag = get_character_field(&record, water_field)
                .with_context(|| format!("record {i}"))?;
            if !config.land_values.iter().any(|land| land.eq_ignore_ascii_case(&flag)) { continue }
        }

        let name = get_character_field(&record, &config.name_field)
            .with_context(|| format!("record {i}"))?;
        if !seen.insert(name.clone()) {
            bail!("duplicate municipality name {:?} (record {i})", name);
        }

        let population = get_population(&record, &config.population_field);
        if population.is_none() {
            log::warn!("[data::shapes] municipality {:?} has no usable {:?} value", name, config.population_field);
        }

        let geometry = common::shape_to_multipolygon(&shape)
            .with_context(|| format!("record {i} ({name})"))?;

        shapes.push(MunicipalityShape { name, population: population.unwrap_or(0), geometry });
    }

    log::info!("[data::shapes] kept {} land municipalities out of {} record(s)", shapes.len(), total);
    Ok(shapes)
}

/// Get the trimmed value of a character field from a Record
fn get_character_field(record: &Record, field: &str) -> Result<String> {
    match record.get(field) {
        Some(FieldValue::Character(Some(s))) => Ok(s.trim().to_string()),
        _ => bail!("missing or invalid character field: {}", field)
    }
}

/// Inhabitant count from a numeric, integer or character field.
fn get_population(record: &Record, field: &str) -> Option<i64> {
    match record.get(field)? {
        FieldValue::Numeric(Some(n)) => Some(n.round() as i64),
        FieldValue::Integer(n) => Some(*n as i64),
        FieldValue::Double(n) => Some(n.round() as i64),
        FieldValue::Float(Some(n)) => Some(n.round() as i64),
        FieldValue::Character(Some(s)) => s.trim().parse().ok(),
        _ => None,
    }
}
