//! Delimited-text export of a whole table.
//!
//! Export always covers the original dataset in input order, ignoring the
//! current search, sort and page. Values are written raw, before any
//! column formatter.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::Table;
use crate::error::TableError;

/// File extension for exported documents.
pub const EXPORT_EXTENSION: &str = "csv";

/// An export ready to be written somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Suggested file name, derived from the table title.
    pub filename: String,
    pub contents: String,
    /// Data rows, excluding the header line.
    pub rows: usize,
}

impl Export {
    /// Write the export into `dir` under its suggested file name.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, TableError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.contents)?;
        info!(path = %path.display(), rows = self.rows, "export written");
        Ok(path)
    }
}

/// Lowercase the title and replace each whitespace run with one hyphen.
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Export file name for a table title.
pub fn export_filename(title: &str) -> String {
    let slug = slugify(title);
    let stem = if slug.is_empty() { "export" } else { slug.as_str() };
    format!("{}.{}", stem, EXPORT_EXTENSION)
}

/// Serialize the table: a header line of column headers, then one line per
/// row of raw values.
///
/// Fields containing the delimiter, a quote or a line break are quoted, and
/// embedded quotes are doubled. An empty value is written bare, even as the
/// only field on its line. Lines are joined with `\n` with no trailing
/// newline. Returns `Ok(None)` for a table without rows.
pub fn export_table(table: &Table, delimiter: u8) -> Result<Option<Export>, TableError> {
    if table.is_empty() {
        return Ok(None);
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(Vec::new());

    let mut bare_empty: Vec<usize> = Vec::new();

    let headers: Vec<String> = table.columns().iter().map(|c| c.header.clone()).collect();
    write_line(&mut writer, &headers, &mut bare_empty)?;
    for row in table.rows() {
        let fields: Vec<String> = table
            .resolved_columns()
            .map(|(_, field)| row.get(field).to_string())
            .collect();
        write_line(&mut writer, &fields, &mut bare_empty)?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| TableError::Io(std::io::Error::other(e.to_string())))?;
    for &start in bare_empty.iter().rev() {
        if bytes.get(start..start + 2) == Some(b"\"\"".as_slice()) {
            bytes.drain(start..start + 2);
        }
    }
    let mut contents = String::from_utf8(bytes)?;
    if contents.ends_with('\n') {
        contents.pop();
    }

    Ok(Some(Export {
        filename: export_filename(table.title()),
        contents,
        rows: table.len(),
    }))
}

/// Write one record.
///
/// The writer quotes a record made of one empty field as `""`; the offset of
/// each such record is pushed to `bare_empty` so the quotes can be dropped.
fn write_line(
    writer: &mut csv::Writer<Vec<u8>>,
    fields: &[String],
    bare_empty: &mut Vec<usize>,
) -> csv::Result<()> {
    if let [only] = fields {
        if only.is_empty() {
            writer.flush()?;
            bare_empty.push(writer.get_ref().len());
        }
    }
    writer.write_record(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Dataset, Formatter, Record, Value};

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn revenue_table() -> Table {
        let dataset = Dataset::from_records(vec![
            record(&[("account", "ACME, Inc".into()), ("revenue", Value::Float(1234.5))]),
            record(&[("account", "Globex".into()), ("revenue", Value::Int(99))]),
        ]);
        let columns = vec![
            Column::new("account", "Account"),
            Column::new("revenue", "Revenue").with_formatter(Formatter::Currency),
        ];
        Table::new("Billing Reconciliation  Q3", columns, dataset).unwrap()
    }

    #[test]
    fn test_export_emits_raw_values() {
        let export = export_table(&revenue_table(), b',').unwrap().unwrap();

        assert_eq!(
            export.contents,
            "Account,Revenue\n\"ACME, Inc\",1234.5\nGlobex,99"
        );
        assert_eq!(export.rows, 2);
        assert_eq!(export.filename, "billing-reconciliation-q3.csv");
    }

    #[test]
    fn test_single_column_empty_values_are_bare() {
        let dataset = Dataset::from_records(vec![
            record(&[("a", Value::from("x"))]),
            record(&[("a", Value::Null)]),
            record(&[("a", Value::from(""))]),
            record(&[("a", Value::from("\"\""))]),
        ]);
        let table = Table::new("Single", vec![Column::new("a", "A")], dataset).unwrap();

        let export = export_table(&table, b',').unwrap().unwrap();
        assert_eq!(export.contents, "A\nx\n\n\n\"\"\"\"\"\"");
    }

    #[test]
    fn test_embedded_quotes_are_escaped() {
        let dataset = Dataset::from_records(vec![record(&[(
            "note",
            Value::from(r#"said "hi", left"#),
        )])]);
        let table = Table::new("Notes", vec![Column::new("note", "Note")], dataset).unwrap();

        let export = export_table(&table, b',').unwrap().unwrap();
        assert_eq!(export.contents, "Note\n\"said \"\"hi\"\", left\"");
    }

    #[test]
    fn test_custom_delimiter_quotes_only_that_delimiter() {
        let export = export_table(&revenue_table(), b';').unwrap().unwrap();
        assert_eq!(export.contents, "Account;Revenue\nACME, Inc;1234.5\nGlobex;99");
    }

    #[test]
    fn test_empty_table_is_skipped() {
        let table = Table::new("Empty", vec![Column::new("a", "A")], Dataset::default()).unwrap();
        assert!(export_table(&table, b',').unwrap().is_none());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Open  Cases\tBy Region"), "open-cases-by-region");
        assert_eq!(slugify("alarms"), "alarms");
        assert_eq!(export_filename("   "), "export.csv");
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let export = export_table(&revenue_table(), b',').unwrap().unwrap();

        let path = export.write_to(&dir.path().join("exports")).unwrap();
        assert_eq!(path.file_name().unwrap(), "billing-reconciliation-q3.csv");
        assert_eq!(std::fs::read_to_string(path).unwrap(), export.contents);
    }
}
