//! Explorer assembly and TSV serialization.
//!
//! An explorer file is a UTF-8, Unix line-ending text file with three kinds
//! of blocks, consumed by a grammar-sensitive external tool:
//!
//! ```text
//! explorerTitle<TAB>Inequality Data Explorer ...      ← header block
//! selection<TAB>Chile<TAB>Brazil<TAB>...
//!
//! graphers                                            ← graphers block
//! <TAB>title<TAB>ySlugs<TAB>...                         (TSV, one-tab indent)
//! <TAB>Gini coefficient ...<TAB>gini_mi_eq<TAB>...
//!
//! table<TAB><url><TAB><tableSlug>                     ← one per data table
//! columns<TAB><tableSlug>
//! <TAB>name<TAB>slug<TAB>...
//! <TAB>Country<TAB>country<TAB>...
//! ```
//!
//! The format must be reproduced byte-for-byte: column order is positional,
//! blocks are separated by single blank lines, and nested TSV is indented by
//! exactly one tab. [`Explorer::render`] also validates structure (no empty
//! blocks, at most one default view) since the consumer has no tolerance for
//! malformed files.

use std::io::Write;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::SerializeError;
use crate::grid::Table;

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

/// One key in the explorer header block, with one or more tab-separated
/// values (e.g. the default country `selection`).
#[derive(Debug, Clone)]
pub struct HeaderField {
    pub key: String,
    pub values: Vec<String>,
}

/// One `table`/`columns` block: the column definitions of a named data table.
#[derive(Debug, Clone)]
pub struct TableBlock {
    pub url: String,
    pub slug: String,
    pub columns: Table,
}

/// A fully assembled explorer, ready to serialize.
#[derive(Debug, Clone, Default)]
pub struct Explorer {
    header: Vec<HeaderField>,
    graphers: Table,
    tables: Vec<TableBlock>,
}

impl Explorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued header field.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.header.push(HeaderField {
            key: key.into(),
            values: vec![value.into()],
        });
    }

    /// Set a multi-valued header field (one value per cell).
    pub fn set_header_list<I, S>(&mut self, key: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header.push(HeaderField {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
    }

    /// Set the graphers table (one row per chart view).
    pub fn set_graphers(&mut self, graphers: Table) {
        self.graphers = graphers;
    }

    pub fn graphers(&self) -> &Table {
        &self.graphers
    }

    /// Append a `table`/`columns` block. Blocks serialize in insertion order.
    pub fn add_table(&mut self, url: impl Into<String>, slug: impl Into<String>, columns: Table) {
        self.tables.push(TableBlock {
            url: url.into(),
            slug: slug.into(),
            columns,
        });
    }

    pub fn tables(&self) -> &[TableBlock] {
        &self.tables
    }

    /// Render the complete explorer file.
    pub fn render(&self) -> Result<String, SerializeError> {
        self.validate()?;

        let mut out = String::new();
        for field in &self.header {
            out.push_str(&field.key);
            out.push('\t');
            let cells: Vec<String> = field.values.iter().map(|v| escape_cell(v)).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }

        out.push_str("\ngraphers\n");
        push_table(&mut out, &self.graphers);

        for block in &self.tables {
            out.push_str(&format!("\ntable\t{}\t{}\n", block.url, block.slug));
            out.push_str(&format!("columns\t{}\n", block.slug));
            push_table(&mut out, &block.columns);
        }

        Ok(out)
    }

    /// Render and write atomically: the content goes to a temp file in the
    /// destination directory, renamed into place on success. A failed run
    /// never leaves a partial explorer behind.
    pub fn write(&self, path: &Path) -> Result<(), SerializeError> {
        let content = self.render()?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), SerializeError> {
        if self.graphers.is_empty() {
            return Err(SerializeError::EmptyGraphers);
        }

        let defaults = (0..self.graphers.len())
            .filter(|&i| self.graphers.text(i, "defaultView") == "true")
            .count();
        if defaults > 1 {
            return Err(SerializeError::MultipleDefaultViews(defaults));
        }
        if defaults == 0 {
            warn!("graphers block has no default view");
        }

        for block in &self.tables {
            if block.columns.is_empty() {
                return Err(SerializeError::EmptyTableBlock(block.slug.clone()));
            }
            check_slugs(block);
        }
        Ok(())
    }
}

/// Duplicate or malformed variable slugs within a table block break the
/// consuming tool at load time; the generators never guarded against them,
/// so surface them loudly without failing the run.
fn check_slugs(block: &TableBlock) {
    let mut seen = std::collections::HashSet::new();
    for i in 0..block.columns.len() {
        let slug = block.columns.text(i, "slug");
        if slug.is_empty() {
            continue;
        }
        if !seen.insert(slug.clone()) {
            warn!(table = %block.slug, %slug, "duplicate variable slug in table block");
        }
        if !SLUG_RE.is_match(&slug) {
            warn!(table = %block.slug, %slug, "variable slug has unexpected characters");
        }
    }
}

/// Serialize a table as TSV (header row + data rows), every line indented by
/// one tab. Cells a row never set render as empty fields, so every line has
/// exactly as many fields as the header row.
fn push_table(out: &mut String, table: &Table) {
    out.push('\t');
    let header: Vec<String> = table.columns().iter().map(|c| escape_cell(c)).collect();
    out.push_str(&header.join("\t"));
    out.push('\n');

    for i in 0..table.len() {
        out.push('\t');
        let cells: Vec<String> = table
            .columns()
            .iter()
            .map(|c| escape_cell(&table.text(i, c)))
            .collect();
        out.push_str(&cells.join("\t"));
        out.push('\n');
    }
}

/// Minimal CSV-style quoting for tab-separated cells: only cells containing
/// a tab, newline or quote get quoted, with inner quotes doubled.
fn escape_cell(cell: &str) -> String {
    if cell.contains('\t') || cell.contains('\n') || cell.contains('\r') || cell.contains('"') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Row;
    use serde_json::Value;

    fn minimal_graphers() -> Table {
        let mut g = Table::new();
        g.push(
            Row::new()
                .set("title", "Gini coefficient (Income before tax)")
                .set("ySlugs", "gini_mi_eq")
                .set("defaultView", "true"),
        );
        g
    }

    fn country_block() -> Table {
        let mut t = Table::new();
        t.push(Row::new().set("name", "Country").set("slug", "country"));
        t
    }

    #[test]
    fn test_single_row_table_block_layout() {
        let mut e = Explorer::new();
        e.set_graphers(minimal_graphers());
        e.add_table("https://example.org/data.csv", "lis_data", country_block());

        let text = e.render().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        let at = lines
            .iter()
            .position(|l| *l == "table\thttps://example.org/data.csv\tlis_data")
            .unwrap();
        assert_eq!(lines[at + 1], "columns\tlis_data");
        assert_eq!(lines[at + 2], "\tname\tslug");
        assert_eq!(lines[at + 3], "\tCountry\tcountry");
    }

    #[test]
    fn test_full_file_structure() {
        let mut e = Explorer::new();
        e.set_header("explorerTitle", "Test Explorer");
        e.set_header_list("selection", ["Chile", "Brazil"]);
        e.set_header("isPublished", "true");
        e.set_graphers(minimal_graphers());
        e.add_table("https://example.org/data.csv", "tab", country_block());

        let text = e.render().unwrap();
        assert_eq!(
            text,
            "explorerTitle\tTest Explorer\n\
             selection\tChile\tBrazil\n\
             isPublished\ttrue\n\
             \n\
             graphers\n\
             \ttitle\tySlugs\tdefaultView\n\
             \tGini coefficient (Income before tax)\tgini_mi_eq\ttrue\n\
             \n\
             table\thttps://example.org/data.csv\ttab\n\
             columns\ttab\n\
             \tname\tslug\n\
             \tCountry\tcountry\n"
        );
    }

    #[test]
    fn test_rows_padded_to_header_width() {
        let mut g = Table::new();
        g.push(Row::new().set("title", "a").set("ySlugs", "s"));
        g.push(Row::new().set("title", "b").set("ySlugs", "s2").set("note", "n"));

        let mut e = Explorer::new();
        e.set_graphers(g);
        let text = e.render().unwrap();

        let field_counts: Vec<usize> = text
            .lines()
            .filter(|l| l.starts_with('\t'))
            .map(|l| l.split('\t').count())
            .collect();
        // every indented line: leading empty split + 3 columns
        assert!(field_counts.iter().all(|&c| c == field_counts[0]));
    }

    #[test]
    fn test_null_and_empty_both_render_empty() {
        let mut g = Table::new();
        g.push(Row::new().set("title", "a").set("unit", "").set_null("note"));
        let mut e = Explorer::new();
        e.set_graphers(g);
        let text = e.render().unwrap();
        assert!(text.contains("\ta\t\t\n"));
    }

    #[test]
    fn test_cell_escaping() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("has\ttab"), "\"has\ttab\"");
        assert_eq!(escape_cell("has \"quote\""), "\"has \"\"quote\"\"\"");
    }

    #[test]
    fn test_empty_table_block_is_error() {
        let mut e = Explorer::new();
        e.set_graphers(minimal_graphers());
        e.add_table("https://example.org/x.csv", "empty_tab", Table::new());
        let err = e.render().unwrap_err();
        assert!(matches!(err, SerializeError::EmptyTableBlock(slug) if slug == "empty_tab"));
    }

    #[test]
    fn test_empty_graphers_is_error() {
        let e = Explorer::new();
        assert!(matches!(e.render(), Err(SerializeError::EmptyGraphers)));
    }

    #[test]
    fn test_multiple_default_views_is_error() {
        let mut g = Table::new();
        g.push(Row::new().set("title", "a").set("defaultView", "true"));
        g.push(Row::new().set("title", "b").set("defaultView", "true"));
        let mut e = Explorer::new();
        e.set_graphers(g);
        assert!(matches!(
            e.render(),
            Err(SerializeError::MultipleDefaultViews(2))
        ));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut e = Explorer::new();
        e.set_header("explorerTitle", "Test");
        e.set_graphers(minimal_graphers());
        e.add_table("https://example.org/x.csv", "tab", country_block());
        assert_eq!(e.render().unwrap(), e.render().unwrap());
    }

    #[test]
    fn test_write_creates_file_and_no_temp_left() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.explorer.tsv");

        let mut e = Explorer::new();
        e.set_graphers(minimal_graphers());
        e.write(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, e.render().unwrap());
        // only the final file remains in the directory
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_failure_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.explorer.tsv");

        let mut e = Explorer::new();
        e.add_table("https://example.org/x.csv", "tab", Table::new());
        assert!(e.write(&path).is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_integer_cast_cells_serialize_without_decimals() {
        let mut g = minimal_graphers();
        g.set_constant("mapTargetTime", Value::from(2019.0));
        g.cast_integer("mapTargetTime").unwrap();
        let mut e = Explorer::new();
        e.set_graphers(g);
        let text = e.render().unwrap();
        assert!(text.contains("\t2019\n"));
        assert!(!text.contains("2019.0"));
    }
}
