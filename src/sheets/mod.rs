//! Reference sheet loading.
//!
//! Explorers are driven by small lookup tables ("reference tables") kept in
//! Google Sheets: one tab per dimension (welfare types, equivalence scales,
//! poverty lines, data tables). Each tab is fetched as CSV through the gviz
//! export endpoint and exposed as an ordered [`RefTable`].
//!
//! Row order always matches the source sheet: downstream expansion relies on
//! it for deterministic slug suffixes and display order.
//!
//! # Example
//!
//! ```rust,ignore
//! use explorergen::sheets::{self, ReadOptions, SheetRef};
//!
//! let sheet = SheetRef::new("1UFdwB1iBpP...", "welfare");
//! let opts = ReadOptions::default().string_column("checkbox");
//! let welfare = sheets::fetch(&client, &sheet, &opts).await?;
//! for row in welfare.rows() {
//!     println!("{}", row.text("title")?);
//! }
//! ```

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{FetchError, TemplateError};

/// One tab of a remote spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetRef {
    /// Spreadsheet document id.
    pub sheet_id: String,
    /// Tab name within the document.
    pub sheet_name: String,
}

impl SheetRef {
    pub fn new(sheet_id: impl Into<String>, sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }

    /// CSV export URL for this tab.
    pub fn url(&self) -> String {
        format!(
            "https://docs.google.com/spreadsheets/d/{}/gviz/tq?tqx=out:csv&sheet={}",
            self.sheet_id, self.sheet_name
        )
    }
}

/// Parsing options for a reference sheet.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Map empty cells to an explicit null instead of an empty string.
    ///
    /// Most sheets keep empty cells as empty strings so they can be
    /// interpolated into templates verbatim; nulls are for sheets where
    /// "no value" must stay distinguishable from "empty text".
    pub empty_as_null: bool,

    /// Columns exempt from numeric auto-parsing.
    ///
    /// Needed for columns whose digits are text, not quantities: slug
    /// fragments with leading zeros, dollar amounts used verbatim in titles.
    pub string_columns: Vec<String>,
}

impl ReadOptions {
    /// Enable null mapping for empty cells.
    pub fn empty_as_null(mut self) -> Self {
        self.empty_as_null = true;
        self
    }

    /// Force a column to stay a string.
    pub fn string_column(mut self, column: impl Into<String>) -> Self {
        self.string_columns.push(column.into());
        self
    }
}

/// An in-memory reference table: ordered rows of column → scalar cell.
#[derive(Debug, Clone)]
pub struct RefTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<RefRow>,
}

/// One row of a reference table. Serializes as a plain column → value object.
#[derive(Debug, Clone, Serialize)]
pub struct RefRow {
    #[serde(skip)]
    sheet: String,
    #[serde(skip)]
    index: usize,
    #[serde(flatten)]
    cells: IndexMap<String, Value>,
}

impl RefTable {
    /// Sheet name this table was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in source order.
    pub fn rows(&self) -> impl Iterator<Item = &RefRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RefRow> {
        self.rows.get(index)
    }

    /// JSON rendering of the table (array of row objects), used by the
    /// `fetch` debug command.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(&self.rows).unwrap_or(Value::Null)
    }
}

impl RefRow {
    /// Zero-based data row index within the sheet.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw cell value, if the column exists.
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }

    /// Render a cell for template interpolation.
    ///
    /// Numbers render in their shortest decimal form, nulls render as the
    /// empty string. A missing column is a [`TemplateError`] naming the
    /// sheet, row and column.
    pub fn text(&self, column: &str) -> Result<String, TemplateError> {
        let cell = self.cells.get(column).ok_or_else(|| TemplateError {
            sheet: self.sheet.clone(),
            row: self.index,
            column: column.to_string(),
        })?;
        Ok(cell_text(cell))
    }
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

// =============================================================================
// Fetching & Parsing
// =============================================================================

/// Fetch one reference tab over HTTP and parse it.
pub async fn fetch(
    client: &reqwest::Client,
    sheet: &SheetRef,
    opts: &ReadOptions,
) -> Result<RefTable, FetchError> {
    let url = sheet.url();
    debug!(sheet = %sheet.sheet_name, %url, "fetching reference sheet");
    let body = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_csv_str(&sheet.sheet_name, &body, opts)
}

/// Parse a reference table from CSV text.
///
/// The first record is the header row; every following record becomes one
/// [`RefRow`]. Records shorter than the header are padded with empty cells,
/// extra cells are ignored.
pub fn parse_csv_str(name: &str, content: &str, opts: &ReadOptions) -> Result<RefTable, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| FetchError::Csv {
            sheet: name.to_string(),
            source: e,
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(FetchError::NoHeader(name.to_string()));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| FetchError::Csv {
            sheet: name.to_string(),
            source: e,
        })?;
        let mut cells = IndexMap::with_capacity(headers.len());
        for (i, column) in headers.iter().enumerate() {
            let raw = record.get(i).unwrap_or("");
            cells.insert(column.clone(), parse_cell(raw, column, opts));
        }
        rows.push(RefRow {
            sheet: name.to_string(),
            index,
            cells,
        });
    }

    if rows.is_empty() {
        return Err(FetchError::EmptySheet(name.to_string()));
    }

    debug!(sheet = name, rows = rows.len(), columns = headers.len(), "parsed reference sheet");
    Ok(RefTable {
        name: name.to_string(),
        columns: headers,
        rows,
    })
}

/// Read a reference table from a local CSV file.
pub fn parse_csv_file(name: &str, path: &std::path::Path, opts: &ReadOptions) -> Result<RefTable, FetchError> {
    let content = std::fs::read_to_string(path)?;
    parse_csv_str(name, &content, opts)
}

fn parse_cell(raw: &str, column: &str, opts: &ReadOptions) -> Value {
    if raw.is_empty() {
        return if opts.empty_as_null {
            Value::Null
        } else {
            Value::String(String::new())
        };
    }
    if opts.string_columns.iter().any(|c| c == column) {
        return Value::String(raw.to_string());
    }
    // Numeric auto-parsing, but never for values with leading zeros
    // ("007" is text, not 7).
    if raw.len() > 1 && raw.starts_with('0') && !raw.starts_with("0.") {
        return Value::String(raw.to_string());
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> ReadOptions {
        ReadOptions::default()
    }

    #[test]
    fn test_parse_simple_sheet() {
        let csv = "title,slug\nincome,mi\nconsumption,dhi";
        let table = parse_csv_str("welfare", csv, &opts()).unwrap();

        assert_eq!(table.name(), "welfare");
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), &["title", "slug"]);
        assert_eq!(table.get(0).unwrap().text("title").unwrap(), "income");
        assert_eq!(table.get(1).unwrap().text("slug").unwrap(), "dhi");
    }

    #[test]
    fn test_row_order_matches_source() {
        let csv = "slug\nc\na\nb";
        let table = parse_csv_str("tables", csv, &opts()).unwrap();
        let slugs: Vec<String> = table.rows().map(|r| r.text("slug").unwrap()).collect();
        assert_eq!(slugs, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_empty_cells_default_to_empty_string() {
        let csv = "a,b\n1,\n,2";
        let table = parse_csv_str("s", csv, &opts()).unwrap();
        assert_eq!(table.get(0).unwrap().value("b"), Some(&Value::String(String::new())));
        assert_eq!(table.get(0).unwrap().text("b").unwrap(), "");
    }

    #[test]
    fn test_empty_as_null_option() {
        let csv = "a,b\n1,\n,2";
        let table = parse_csv_str("s", csv, &ReadOptions::default().empty_as_null()).unwrap();
        assert_eq!(table.get(0).unwrap().value("b"), Some(&Value::Null));
        // null still renders as empty text
        assert_eq!(table.get(0).unwrap().text("b").unwrap(), "");
    }

    #[test]
    fn test_numeric_auto_parsing() {
        let csv = "cents,dollars\n215,2.15\n365,3.65";
        let table = parse_csv_str("povlines_abs", csv, &opts()).unwrap();
        assert_eq!(table.get(0).unwrap().value("cents"), Some(&Value::from(215)));
        assert_eq!(table.get(0).unwrap().value("dollars"), Some(&Value::from(2.15)));
        assert_eq!(table.get(0).unwrap().text("cents").unwrap(), "215");
        assert_eq!(table.get(0).unwrap().text("dollars").unwrap(), "2.15");
    }

    #[test]
    fn test_string_columns_skip_auto_parsing() {
        let csv = "dollars_text,cents\n2.15,215";
        let table = parse_csv_str(
            "povlines_abs",
            csv,
            &ReadOptions::default().string_column("dollars_text"),
        )
        .unwrap();
        assert_eq!(
            table.get(0).unwrap().value("dollars_text"),
            Some(&Value::String("2.15".to_string()))
        );
        assert_eq!(table.get(0).unwrap().value("cents"), Some(&Value::from(215)));
    }

    #[test]
    fn test_leading_zeros_stay_text() {
        let csv = "code\n007";
        let table = parse_csv_str("s", csv, &opts()).unwrap();
        assert_eq!(table.get(0).unwrap().text("code").unwrap(), "007");
    }

    #[test]
    fn test_missing_column_is_template_error() {
        let csv = "title\nincome";
        let table = parse_csv_str("welfare", csv, &opts()).unwrap();
        let err = table.get(0).unwrap().text("scale_gini").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("welfare"));
        assert!(msg.contains("row 0"));
        assert!(msg.contains("scale_gini"));
    }

    #[test]
    fn test_short_records_padded() {
        let csv = "a,b,c\n1,2";
        let table = parse_csv_str("s", csv, &opts()).unwrap();
        assert_eq!(table.get(0).unwrap().text("c").unwrap(), "");
    }

    #[test]
    fn test_empty_sheet_error() {
        let csv = "a,b\n";
        let err = parse_csv_str("tables", csv, &opts()).unwrap_err();
        assert!(matches!(err, FetchError::EmptySheet(_)));
    }

    #[test]
    fn test_quoted_cells() {
        let csv = "note\n\"Contains, a comma\"";
        let table = parse_csv_str("s", csv, &opts()).unwrap();
        assert_eq!(table.get(0).unwrap().text("note").unwrap(), "Contains, a comma");
    }

    #[test]
    fn test_to_json() {
        let csv = "slug,cents\nipl,215";
        let table = parse_csv_str("povlines_abs", csv, &opts()).unwrap();
        let json = table.to_json();
        assert_eq!(json[0]["slug"], "ipl");
        assert_eq!(json[0]["cents"], 215);
        // only sheet columns appear in the object
        assert_eq!(json[0].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_sheet_url() {
        let sheet = SheetRef::new("abc123", "welfare");
        assert_eq!(
            sheet.url(),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:csv&sheet=welfare"
        );
    }
}
