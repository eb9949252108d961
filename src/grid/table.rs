//! Append-only output table with ordered columns and post-processing.

use indexmap::IndexMap;
use serde_json::Value;

use super::Row;
use crate::error::PostProcessError;

/// An output table built by appending [`Row`]s.
///
/// Columns are registered in the order they are first introduced across all
/// pushed rows, and rows stay in push order. Both orders are load-bearing:
/// the consuming tool reads blocks by column position, and the first grapher
/// row per selector combination is the one initially displayed.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<IndexMap<String, Value>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, registering any previously unseen fields as new columns.
    pub fn push(&mut self, row: Row) {
        let fields = row.into_fields();
        for field in fields.keys() {
            if !self.columns.iter().any(|c| c == field) {
                self.columns.push(field.clone());
            }
        }
        self.rows.push(fields);
    }

    /// Column names in first-introduction order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value at (row, column); null for cells a row never set.
    pub fn value(&self, row: usize, column: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }

    /// Rendered text of a cell (empty for null), used for comparisons and
    /// serialization.
    pub fn text(&self, row: usize, column: &str) -> String {
        cell_text(self.value(row, column))
    }

    // =========================================================================
    // Post-processing
    // =========================================================================

    /// Drop rows not matching the predicate, preserving relative order.
    ///
    /// The predicate receives (row index, table) and typically compares a
    /// single cell, e.g. dropping rows whose `ySlugs` is empty.
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(usize, &Table) -> bool,
    {
        let keep: Vec<bool> = (0..self.rows.len())
            .map(|i| predicate(i, self))
            .collect();
        let mut i = 0;
        self.rows.retain(|_| {
            let k = keep[i];
            i += 1;
            k
        });
    }

    /// Assign a constant value to a column for every row, registering the
    /// column if new. Passing [`Value::Null`] adds an all-null column.
    pub fn set_constant(&mut self, column: &str, value: Value) {
        if !self.columns.iter().any(|c| c == column) {
            self.columns.push(column.to_string());
        }
        for row in &mut self.rows {
            row.insert(column.to_string(), value.clone());
        }
    }

    /// Cast a column to integer.
    ///
    /// Accepts integer cells, integral floats and integral digit strings;
    /// nulls pass through untouched. A value with a fractional part fails
    /// the run instead of silently corrupting the output.
    pub fn cast_integer(&mut self, column: &str) -> Result<(), PostProcessError> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(PostProcessError::UnknownColumn(column.to_string()));
        }
        for (i, row) in self.rows.iter_mut().enumerate() {
            let cell = row.get(column).cloned().unwrap_or(Value::Null);
            let cast = match &cell {
                Value::Null => continue,
                Value::Number(n) if n.is_i64() || n.is_u64() => continue,
                Value::Number(n) => {
                    let f = n.as_f64().unwrap_or(f64::NAN);
                    if f.fract() == 0.0 && f.is_finite() {
                        Value::from(f as i64)
                    } else {
                        return Err(non_integral(column, i, &cell));
                    }
                }
                Value::String(s) => match s.parse::<i64>() {
                    Ok(v) => Value::from(v),
                    Err(_) => return Err(non_integral(column, i, &cell)),
                },
                _ => return Err(non_integral(column, i, &cell)),
            };
            row.insert(column.to_string(), cast);
        }
        Ok(())
    }

    /// Flag the single default view.
    ///
    /// Sets `defaultView = "true"` on the one row whose cells equal every
    /// `(column, value)` condition. The original generators silently did
    /// nothing when the mask matched zero or several rows; here both cases
    /// abort the run so a stale condition cannot ship an explorer with no
    /// initial view.
    pub fn mark_default_view(&mut self, conditions: &[(&str, &str)]) -> Result<(), PostProcessError> {
        for (column, _) in conditions {
            if !self.columns.iter().any(|c| c == column) {
                return Err(PostProcessError::UnknownColumn(column.to_string()));
            }
        }
        let matches: Vec<usize> = (0..self.rows.len())
            .filter(|&i| {
                conditions
                    .iter()
                    .all(|(column, value)| self.text(i, column) == *value)
            })
            .collect();
        match matches.as_slice() {
            [] => Err(PostProcessError::NoDefaultView),
            [i] => {
                let i = *i;
                if !self.columns.iter().any(|c| c == "defaultView") {
                    self.columns.push("defaultView".to_string());
                }
                self.rows[i].insert("defaultView".to_string(), Value::from("true"));
                Ok(())
            }
            many => Err(PostProcessError::AmbiguousDefaultView(many.len())),
        }
    }

    /// Extract the rows whose `column` equals `value`, dropping the grouping
    /// column itself. Used to split the column-definition table into one
    /// block per `tableSlug`.
    pub fn subset(&self, column: &str, value: &str) -> Table {
        let columns: Vec<String> = self
            .columns
            .iter()
            .filter(|c| c.as_str() != column)
            .cloned()
            .collect();
        let rows: Vec<IndexMap<String, Value>> = (0..self.rows.len())
            .filter(|&i| self.text(i, column) == value)
            .map(|i| {
                let mut row = self.rows[i].clone();
                row.shift_remove(column);
                row
            })
            .collect();
        Table { columns, rows }
    }
}

fn non_integral(column: &str, row: usize, cell: &Value) -> PostProcessError {
    PostProcessError::NonIntegral {
        column: column.to_string(),
        row,
        value: cell_text(cell),
    }
}

pub(crate) fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grapher(title: &str, yslugs: &str, dropdown: &str) -> Row {
        Row::new()
            .set("title", title)
            .set("ySlugs", yslugs)
            .set("Indicator Dropdown", dropdown)
    }

    #[test]
    fn test_columns_in_first_introduction_order() {
        let mut t = Table::new();
        t.push(Row::new().set("name", "Country").set("slug", "country"));
        t.push(Row::new().set("name", "Gini").set("slug", "gini").set("unit", ""));
        assert_eq!(t.columns(), &["name", "slug", "unit"]);
    }

    #[test]
    fn test_missing_cells_render_empty() {
        let mut t = Table::new();
        t.push(Row::new().set("a", "1"));
        t.push(Row::new().set("a", "2").set("b", "3"));
        assert_eq!(t.text(0, "b"), "");
        assert_eq!(t.value(0, "b"), &Value::Null);
        assert_eq!(t.text(1, "b"), "3");
    }

    #[test]
    fn test_retain_preserves_relative_order() {
        // 5 rows, 2 with empty ySlugs, filter must yield 3 in original order
        let mut t = Table::new();
        t.push(grapher("a", "slug_a", "x"));
        t.push(grapher("b", "", "x"));
        t.push(grapher("c", "slug_c", "x"));
        t.push(grapher("d", "", "x"));
        t.push(grapher("e", "slug_e", "x"));

        t.retain(|i, t| !t.text(i, "ySlugs").is_empty());

        assert_eq!(t.len(), 3);
        let titles: Vec<String> = (0..3).map(|i| t.text(i, "title")).collect();
        assert_eq!(titles, vec!["a", "c", "e"]);
    }

    #[test]
    fn test_set_constant_registers_column() {
        let mut t = Table::new();
        t.push(grapher("a", "s", "x"));
        t.set_constant("yAxisMin", Value::from(0));
        t.set_constant("relatedQuestionText", Value::Null);
        assert_eq!(t.text(0, "yAxisMin"), "0");
        assert_eq!(t.value(0, "relatedQuestionText"), &Value::Null);
        assert!(t.columns().contains(&"yAxisMin".to_string()));
    }

    #[test]
    fn test_cast_integer_from_float_and_string() {
        let mut t = Table::new();
        t.push(Row::new().set("mapTargetTime", 2019.0).set("tolerance", "5"));
        t.cast_integer("mapTargetTime").unwrap();
        t.cast_integer("tolerance").unwrap();
        assert_eq!(t.value(0, "mapTargetTime"), &Value::from(2019));
        assert_eq!(t.text(0, "mapTargetTime"), "2019");
        assert_eq!(t.value(0, "tolerance"), &Value::from(5));
    }

    #[test]
    fn test_cast_integer_rejects_fractional() {
        let mut t = Table::new();
        t.push(Row::new().set("tolerance", 5.5));
        let err = t.cast_integer("tolerance").unwrap_err();
        assert!(matches!(err, PostProcessError::NonIntegral { .. }));
    }

    #[test]
    fn test_cast_integer_passes_nulls() {
        let mut t = Table::new();
        t.push(Row::new().set_null("mapTargetTime"));
        t.push(Row::new().set("mapTargetTime", 2019));
        t.cast_integer("mapTargetTime").unwrap();
        assert_eq!(t.value(0, "mapTargetTime"), &Value::Null);
    }

    #[test]
    fn test_cast_integer_unknown_column() {
        let mut t = Table::new();
        t.push(grapher("a", "s", "x"));
        assert!(matches!(
            t.cast_integer("nope"),
            Err(PostProcessError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_mark_default_view_exactly_one() {
        let mut t = Table::new();
        t.push(grapher("a", "s1", "Gini coefficient"));
        t.push(grapher("b", "s2", "Palma ratio"));
        t.mark_default_view(&[("Indicator Dropdown", "Gini coefficient")])
            .unwrap();
        assert_eq!(t.text(0, "defaultView"), "true");
        assert_eq!(t.text(1, "defaultView"), "");
    }

    #[test]
    fn test_mark_default_view_zero_matches() {
        let mut t = Table::new();
        t.push(grapher("a", "s1", "Gini coefficient"));
        let err = t
            .mark_default_view(&[("Indicator Dropdown", "P90/P10")])
            .unwrap_err();
        assert!(matches!(err, PostProcessError::NoDefaultView));
    }

    #[test]
    fn test_mark_default_view_many_matches() {
        let mut t = Table::new();
        t.push(grapher("a", "s1", "Gini coefficient"));
        t.push(grapher("b", "s2", "Gini coefficient"));
        let err = t
            .mark_default_view(&[("Indicator Dropdown", "Gini coefficient")])
            .unwrap_err();
        assert!(matches!(err, PostProcessError::AmbiguousDefaultView(2)));
    }

    #[test]
    fn test_mark_default_view_conjunction() {
        let mut t = Table::new();
        t.push(
            Row::new()
                .set("Indicator Dropdown", "Gini coefficient")
                .set("Income measure Dropdown", "Before tax"),
        );
        t.push(
            Row::new()
                .set("Indicator Dropdown", "Gini coefficient")
                .set("Income measure Dropdown", "After tax"),
        );
        t.mark_default_view(&[
            ("Indicator Dropdown", "Gini coefficient"),
            ("Income measure Dropdown", "After tax"),
        ])
        .unwrap();
        assert_eq!(t.text(1, "defaultView"), "true");
    }

    #[test]
    fn test_subset_drops_grouping_column() {
        let mut t = Table::new();
        t.push(Row::new().set("name", "Gini").set("tableSlug", "lis"));
        t.push(Row::new().set("name", "Palma").set("tableSlug", "wid"));
        t.push(Row::new().set("name", "Share").set("tableSlug", "lis"));

        let lis = t.subset("tableSlug", "lis");
        assert_eq!(lis.len(), 2);
        assert_eq!(lis.columns(), &["name"]);
        assert_eq!(lis.text(0, "name"), "Gini");
        assert_eq!(lis.text(1, "name"), "Share");
        // source table untouched
        assert_eq!(t.len(), 3);
    }
}
