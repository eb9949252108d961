//! Explorergen - Generate data explorer configuration files from Google Sheets
//!
//! The pipeline turns small reference sheets into large, repetitive explorer
//! TSV files consumed by a charting tool:
//!
//! ```text
//! Google Sheets ──► sheets::fetch ──► grid::cartesian* ──► grid::Table ──► tsv::Explorer
//!  (CSV export)     (typed tables)    (view expansion)    (post-process)   (TSV render)
//! ```
//!
//! - [`sheets`] fetches sheet tabs via the CSV export endpoint and parses
//!   them into [`RefTable`]s of typed cells.
//! - [`grid`] expands Cartesian products of reference rows into templated
//!   output rows, then filters, adds constant columns, casts integer columns
//!   and flags the default view.
//! - [`tsv`] assembles header, graphers and table blocks and serializes the
//!   indented block-structured explorer file, byte-for-byte.
//! - [`explorers`] holds the registered explorer definitions driving the
//!   pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use explorergen::explorers;
//!
//! let client = reqwest::Client::new();
//! let explorer = explorers::build("lis-inequality", &client).await?;
//! explorer.write(std::path::Path::new("explorers/lis-inequality.explorer.tsv"))?;
//! ```

pub mod error;
pub mod explorers;
pub mod grid;
pub mod sheets;
pub mod tsv;

pub use error::{FetchError, PipelineError, PostProcessError, SerializeError, TemplateError};
pub use grid::{cartesian2, cartesian3, Row, Table};
pub use sheets::{fetch, parse_csv_file, parse_csv_str, ReadOptions, RefRow, RefTable, SheetRef};
pub use tsv::{Explorer, HeaderField, TableBlock};
