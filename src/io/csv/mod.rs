//! Delimited text: case count input and joined-table export.

mod read;
mod write;

pub(crate) use read::{read_csv_strings, read_csv_strings_bytes};
pub(crate) use write::write_joined_csv;
