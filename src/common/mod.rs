mod fs;
#[cfg(feature = "download")]
mod download;
mod polygon;

pub(crate) use fs::*;
#[cfg(feature = "download")]
pub(crate) use download::*;
pub(crate) use polygon::*;
