use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueHint};

use crate::rate::RateMode;

/// COVID-19 choropleth CLI
#[derive(Parser, Debug)]
#[command(name = "covidmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON configuration file (all fields optional)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the configured one
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download case counts and municipal boundaries into the data directory
    Download(DownloadArgs),

    /// Render the map for one date
    Render(RenderArgs),

    /// Print the range of dates with case data
    Range,

    /// List the available color gradients
    Gradients,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Overwrite files that already exist
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Publication date, YYYY-MM-DD
    pub date: NaiveDate,

    /// Color gradient name (see `covidmap gradients`)
    #[arg(short, long)]
    pub gradient: Option<String>,

    /// Output image; `.svg` writes SVG, anything else PNG
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Rate presentation
    #[arg(long, value_enum)]
    pub rate_mode: Option<RateMode>,

    /// Also write the joined table (name,population,cases,rate) to this CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub export_csv: Option<PathBuf>,
}
