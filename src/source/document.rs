//! The JSON document format for datasets.
//!
//! Two shapes are accepted. A bare array of objects:
//!
//! ```json
//! [{ "account": "ACME", "revenue": 1234.5 }]
//! ```
//!
//! or a full document with a title and explicit columns:
//!
//! ```json
//! {
//!   "title": "Billing Reconciliation",
//!   "columns": [
//!     { "key": "account", "header": "Account" },
//!     { "key": "revenue", "header": "Revenue", "format": "currency" },
//!     { "key": "notes", "sortable": false }
//!   ],
//!   "rows": [{ "account": "ACME", "revenue": 1234.5 }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::data::{header_from_key, Column, Dataset, Formatter, Record, Table, Value};
use crate::error::TableError;

type JsonObject = serde_json::Map<String, serde_json::Value>;

/// A dataset as delivered by a [`DataSource`](super::DataSource).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "DocumentRepr")]
pub struct DatasetDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<JsonObject>,
}

/// A column as written in a dataset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    /// Defaults to a label derived from the key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(default = "default_sortable")]
    pub sortable: bool,
    /// Formatter name, e.g. `currency` or `fixed:2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

fn default_sortable() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentRepr {
    Rows(Vec<JsonObject>),
    Full(DocumentBody),
}

#[derive(Deserialize)]
struct DocumentBody {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    columns: Option<Vec<ColumnSpec>>,
    /// `null` and a missing key both mean no rows.
    #[serde(default)]
    rows: Option<Vec<JsonObject>>,
}

impl From<DocumentRepr> for DatasetDocument {
    fn from(repr: DocumentRepr) -> Self {
        match repr {
            DocumentRepr::Rows(rows) => DatasetDocument {
                title: None,
                columns: Vec::new(),
                rows,
            },
            DocumentRepr::Full(body) => DatasetDocument {
                title: body.title,
                columns: body.columns.unwrap_or_default(),
                rows: body.rows.unwrap_or_default(),
            },
        }
    }
}

impl ColumnSpec {
    fn into_column(self) -> Result<Column, TableError> {
        let header = self.header.unwrap_or_else(|| header_from_key(&self.key));
        let mut column = Column::new(self.key, header);
        column.sortable = self.sortable;
        if let Some(name) = self.format {
            column.formatter = Some(name.parse::<Formatter>()?);
        }
        Ok(column)
    }
}

impl DatasetDocument {
    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Build a validated table.
    ///
    /// Uses the document's title, or `default_title` when it has none.
    /// Without explicit columns, one column per field is derived.
    pub fn into_table(self, default_title: &str) -> Result<Table, TableError> {
        let title = self.title.unwrap_or_else(|| default_title.to_string());
        let records = self.rows.into_iter().map(|row| {
            row.into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect::<Record>()
        });
        let dataset = Dataset::from_records(records);

        if self.columns.is_empty() {
            return Ok(Table::with_derived_columns(title, dataset));
        }

        let columns = self
            .columns
            .into_iter()
            .map(ColumnSpec::into_column)
            .collect::<Result<Vec<_>, _>>()?;
        Table::new(title, columns, dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let doc = DatasetDocument::from_json(r#"[{"b": 1, "a": "x"}, {"c": null}]"#).unwrap();
        assert!(doc.title.is_none());
        assert_eq!(doc.rows.len(), 2);

        let table = doc.into_table("Alarms").unwrap();
        assert_eq!(table.title(), "Alarms");
        let keys: Vec<&str> = table.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_full_document() {
        let doc = DatasetDocument::from_json(
            r#"{
                "title": "Billing Reconciliation",
                "columns": [
                    { "key": "account_id" },
                    { "key": "revenue", "header": "Revenue", "format": "currency" },
                    { "key": "notes", "sortable": false }
                ],
                "rows": [
                    { "account_id": "A-1", "revenue": 1234.5, "notes": "ok" }
                ]
            }"#,
        )
        .unwrap();

        let table = doc.into_table("ignored").unwrap();
        assert_eq!(table.title(), "Billing Reconciliation");
        assert_eq!(table.columns()[0].header, "Account Id");
        assert!(!table.columns()[2].sortable);
        assert_eq!(table.display_row(&table.rows()[0])[1], "$1,234.50");
    }

    #[test]
    fn test_null_rows_default_to_empty() {
        let doc = DatasetDocument::from_json(r#"{"title": "Cases", "rows": null}"#).unwrap();
        assert!(doc.rows.is_empty());
        assert!(doc.into_table("x").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_formatter_rejected() {
        let doc = DatasetDocument::from_json(
            r#"{"columns": [{"key": "a", "format": "roman"}], "rows": [{"a": 1}]}"#,
        )
        .unwrap();
        assert!(matches!(
            doc.into_table("x"),
            Err(TableError::UnknownFormatter(_))
        ));
    }

    #[test]
    fn test_oversized_precision_rejected_at_load() {
        let doc = DatasetDocument::from_json(
            r#"{"columns": [{"key": "a", "format": "fixed:70000"}], "rows": [{"a": 1.5}]}"#,
        )
        .unwrap();
        assert!(matches!(
            doc.into_table("x"),
            Err(TableError::UnknownFormatter(_))
        ));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let doc = DatasetDocument::from_json(r#"{"columns": [{"key": "b"}], "rows": [{"a": 1}]}"#)
            .unwrap();
        assert!(matches!(doc.into_table("x"), Err(TableError::UnknownColumn(_))));
    }
}
