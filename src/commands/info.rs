use anyhow::Result;

use crate::{
    cli::Cli,
    color::Gradient,
    common::{find_shapefile, require_file_exists},
    data::CaseTable,
};

/// Print the first and last publication date in the case data.
pub fn range(cli: &Cli) -> Result<()> {
    let config = super::load_config(cli)?;
    let cases_path = config.cases_path();
    require_file_exists(&cases_path)?;

    let table = CaseTable::read_csv(&cases_path, &config.cases)?;
    match table.date_range() {
        Some(range) => println!("{} {}", range.min(), range.max()),
        None => println!("no case data in {}", cases_path.display()),
    }

    if find_shapefile(&config.shapes_dir(), &config.shapes.shp_match).is_err() {
        log::warn!("[range] no municipal shapefile under {}", config.shapes_dir().display());
    }
    Ok(())
}

/// Print every gradient name, the default first.
pub fn gradients() -> Result<()> {
    let default = Gradient::default();
    println!("{} (default)", default.name());
    for gradient in Gradient::ALL.into_iter().filter(|g| *g != default) {
        println!("{}", gradient.name());
    }
    Ok(())
}
