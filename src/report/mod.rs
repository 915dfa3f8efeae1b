//! Result surfaces of a run: CSV tables, rendered histograms, and the
//! markdown/JSON reports.

pub mod csv_export;
pub mod plots;
pub mod summary;
