//! Cartesian iteration over reference tables.
//!
//! Expansion visits dimension combinations in row-major order: the first
//! table is the outer loop, the last the inner one. Combined with the fixed
//! emission order of row kinds per combination, this fully determines the
//! output row order.

use crate::sheets::{RefRow, RefTable};

/// Iterate the Cartesian product of two reference tables, outer × inner.
pub fn cartesian2<'a>(
    outer: &'a RefTable,
    inner: &'a RefTable,
) -> impl Iterator<Item = (&'a RefRow, &'a RefRow)> {
    outer
        .rows()
        .flat_map(move |a| inner.rows().map(move |b| (a, b)))
}

/// Iterate the Cartesian product of three reference tables, outermost first.
pub fn cartesian3<'a>(
    outer: &'a RefTable,
    mid: &'a RefTable,
    inner: &'a RefTable,
) -> impl Iterator<Item = (&'a RefRow, &'a RefRow, &'a RefRow)> {
    outer.rows().flat_map(move |a| {
        mid.rows()
            .flat_map(move |b| inner.rows().map(move |c| (a, b, c)))
    })
}
