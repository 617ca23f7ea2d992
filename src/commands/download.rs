use anyhow::Result;

use crate::cli::{Cli, DownloadArgs};

#[cfg(feature = "download")]
pub fn run(cli: &Cli, args: &DownloadArgs) -> Result<()> {
    use crate::common::{download_big_file, ensure_dir_exists, extract_zip, find_shapefile};

    let config = super::load_config(cli)?;
    ensure_dir_exists(&config.data_dir)?;

    let cases_path = config.cases_path();
    if cases_path.exists() && !args.force {
        log::info!("[download] {} exists, skipping (use --force to refresh)", cases_path.display());
    } else {
        log::info!("[download] {} -> {}", config.cases.url, cases_path.display());
        download_big_file(&config.cases.url, &cases_path, args.force)?;
    }

    let shapes_dir = config.shapes_dir();
    if find_shapefile(&shapes_dir, &config.shapes.shp_match).is_ok() && !args.force {
        log::info!("[download] shapefile already present under {}, skipping", shapes_dir.display());
    } else {
        let zip_path = config.data_dir.join(format!("{}.zip", config.shapes.dir_name));
        log::info!("[download] {} -> {}", config.shapes.url, zip_path.display());
        download_big_file(&config.shapes.url, &zip_path, args.force)?;

        ensure_dir_exists(&shapes_dir)?;
        extract_zip(&zip_path, &shapes_dir, true)?;
    }

    let shp_path = find_shapefile(&shapes_dir, &config.shapes.shp_match)?;
    println!("Case counts: {}", cases_path.display());
    println!("Municipalities: {}", shp_path.display());
    Ok(())
}

#[cfg(not(feature = "download"))]
pub fn run(_cli: &Cli, _args: &DownloadArgs) -> Result<()> {
    anyhow::bail!("covidmap was built without the `download` feature")
}
