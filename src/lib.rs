//! sheetmark - Excel/CSV to Markdown table converter with automatic encoding detection
//!
//! This crate converts tabular data (Excel workbooks or CSV files) into
//! Markdown table syntax. CSV files go through statistical charset detection
//! with a fixed fallback ladder before decoding, so files in GBK, GB18030,
//! Big5 and friends convert without manual configuration.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sheetmark::{ConverterBuilder, NullSink};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Convert a file to a Markdown string
//!     let markdown = converter.convert_file(Path::new("report.xlsx"), &NullSink::new())?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sheetmark::{ConverterBuilder, NullSink, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Name("Summary".to_string()))
//!         .include_headers(false)
//!         .with_encoding_override("gbk")  // skip CSV encoding detection
//!         .build()?;
//!
//!     converter.convert_file_to(
//!         Path::new("data.csv"),
//!         Path::new("data.md"),
//!         &NullSink::new(),
//!     )?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Batch Conversion
//!
//! ```rust,no_run
//! use std::path::Path;
//! use sheetmark::{ConsoleSink, ConverterBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let summary = converter.convert_directory(
//!         Path::new("input"),
//!         Some(Path::new("output")),
//!         true,  // recursive
//!         &ConsoleSink::new(),
//!     )?;
//!     println!("{} converted, {} failed", summary.converted(), summary.failed());
//!     Ok(())
//! }
//! ```
//!
//! # Low-level API
//!
//! The two core building blocks are exposed directly:
//!
//! ```rust
//! use sheetmark::{render_markdown, CellValue, Grid};
//!
//! let grid = Grid::new(
//!     vec!["X".to_string(), "Y".to_string()],
//!     vec![vec![
//!         CellValue::Text("a".to_string()),
//!         CellValue::Number(1.0),
//!     ]],
//! );
//! assert_eq!(
//!     render_markdown(&grid, true),
//!     "| X | Y |\n| --- | --- |\n| a | 1 |"
//! );
//! ```

mod api;
mod builder;
mod encoding;
mod error;
mod grid;
mod loader;
mod progress;
mod render;
mod walker;

// 公開API
pub use api::SheetSelector;
pub use builder::{BatchSummary, Converter, ConverterBuilder, FileOutcome};
pub use encoding::{detect_encoding, detect_from_sample, FALLBACK_LADDER};
pub use error::SheetMarkError;
pub use grid::{CellValue, Grid};
pub use loader::{is_supported, list_sheets, load, SUPPORTED_EXTENSIONS};
pub use progress::{ConsoleSink, NullSink, ProgressSink};
pub use render::render_markdown;
pub use walker::find_files;
