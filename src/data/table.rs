//! Column descriptors and the validated table they describe.

use std::collections::HashSet;

use super::{Dataset, Formatter, Record, Row, Value};
use crate::error::TableError;

/// Describes how one field is labelled, formatted and sorted.
#[derive(Debug, Clone)]
pub struct Column {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    pub formatter: Option<Formatter>,
}

impl Column {
    /// A sortable column with no formatter.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: true,
            formatter: None,
        }
    }

    /// Disable sorting for this column.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Display text for a raw value.
    pub fn display(&self, value: &Value) -> String {
        match &self.formatter {
            Some(f) => f.apply(value),
            None => value.to_string(),
        }
    }
}

/// Derive a header label from a field key (`billing_account` -> `Billing Account`).
pub fn header_from_key(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A titled dataset with its columns resolved against the dataset schema.
///
/// Column keys are checked once here, so lookups during the pipeline
/// never encounter an unknown key.
#[derive(Debug, Clone, Default)]
pub struct Table {
    title: String,
    columns: Vec<Column>,
    /// Schema position for each column, parallel to `columns`.
    fields: Vec<usize>,
    dataset: Dataset,
}

impl Table {
    /// Validate columns against the dataset.
    ///
    /// Fails on duplicate keys, or on a key that no record carries. Over an
    /// empty dataset every key is accepted.
    pub fn new(
        title: impl Into<String>,
        columns: Vec<Column>,
        mut dataset: Dataset,
    ) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(columns.len());

        for column in &columns {
            if !seen.insert(column.key.as_str()) {
                return Err(TableError::DuplicateColumn(column.key.clone()));
            }
            let field = match dataset.field_index(&column.key) {
                Some(pos) => pos,
                None if dataset.is_empty() => dataset.declare_field(&column.key),
                None => return Err(TableError::UnknownColumn(column.key.clone())),
            };
            fields.push(field);
        }

        Ok(Self {
            title: title.into(),
            columns,
            fields,
            dataset,
        })
    }

    /// A table with one column per schema field, headers derived from keys.
    pub fn with_derived_columns(title: impl Into<String>, dataset: Dataset) -> Self {
        let columns: Vec<Column> = dataset
            .fields()
            .iter()
            .map(|key| Column::new(key.clone(), header_from_key(key)))
            .collect();
        let fields = (0..columns.len()).collect();
        Self {
            title: title.into(),
            columns,
            fields,
            dataset,
        }
    }

    /// An empty, column-less table.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Schema position of a column key.
    pub fn field_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key).map(|i| self.fields[i])
    }

    /// Pairs of column and schema position, in display order.
    pub fn resolved_columns(&self) -> impl Iterator<Item = (&Column, usize)> {
        self.columns.iter().zip(self.fields.iter().copied())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn rows(&self) -> &[Row] {
        self.dataset.rows()
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// The original record for a row of this table.
    pub fn record(&self, row: &Row) -> Record {
        self.dataset.record(row)
    }

    /// Display text for every column of a row.
    pub fn display_row(&self, row: &Row) -> Vec<String> {
        self.resolved_columns()
            .map(|(column, field)| column.display(row.get(field)))
            .collect()
    }
}
