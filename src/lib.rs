#![doc = "covidmap public API"]
pub mod cli;
pub mod color;
mod common;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod guard;
mod io;
pub mod join;
pub mod pipeline;
pub mod rate;
pub mod render;
pub mod types;

#[doc(inline)]
pub use color::{Gradient, Rgb};

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use data::CaseTable;

#[doc(inline)]
pub use error::MapError;

#[doc(inline)]
pub use guard::{DateCheck, DateRange};

#[doc(inline)]
pub use pipeline::{Dataset, Pipeline};

#[doc(inline)]
pub use rate::RateMode;

#[doc(inline)]
pub use render::{Canvas, ChoroplethMap, Fill};

#[doc(inline)]
pub use types::{CaseRecord, JoinedRecord, MunicipalityShape};
