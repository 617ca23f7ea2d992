pub mod download;
pub mod info;
pub mod render;

use anyhow::Result;

use crate::{cli::Cli, config::Config};

/// Configuration from `--config` (or defaults) with global flag overrides applied.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    log::debug!("[config] {:?}", config);
    Ok(config)
}
