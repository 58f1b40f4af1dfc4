//! CSV export of cached listing matches.

mod csv_writer;

pub use csv_writer::{export_matches, ExportFilter, CSV_HEADERS};
