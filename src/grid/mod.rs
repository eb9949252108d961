//! Output table construction.
//!
//! The expansion step of every explorer follows the same shape: iterate the
//! Cartesian product of reference tables and, for each combination, append
//! one output row per row kind (indicator), with every field produced by
//! interpolating reference values into a template string.
//!
//! - [`Row`] - insertion-ordered field builder for one output row
//! - [`Table`] - append-only row list with a first-introduction column order
//! - [`cartesian2`] / [`cartesian3`] - dimension iteration in row-major order
//!
//! Post-processing (filtering, constant columns, integer casts, default-view
//! selection) lives on [`Table`] as well; all of it preserves relative row
//! order, which determines display order in the consuming tool.

mod expand;
mod row;
mod table;

pub use expand::{cartesian2, cartesian3};
pub use row::Row;
pub use table::Table;
