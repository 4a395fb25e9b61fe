//! Spreadsheet export of sales

pub mod csv;

pub use csv::{export_filename, sales_to_csv};
