//! Row records and their schema-aligned storage.

use std::collections::BTreeMap;

use super::Value;

/// An open-ended mapping from field name to value, as supplied by callers.
pub type Record = BTreeMap<String, Value>;

static NULL: Value = Value::Null;

/// One row, stored positionally against the owning [`Dataset`]'s schema.
///
/// A field the original record did not carry is stored as absent, so
/// search only sees the fields the record actually had.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<Option<Value>>,
}

impl Row {
    /// Value at a schema position. Absent fields read as [`Value::Null`].
    pub fn get(&self, field: usize) -> &Value {
        self.cells.get(field).and_then(Option::as_ref).unwrap_or(&NULL)
    }

    /// Values of the fields this row carries, in schema order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.cells.iter().flatten()
    }
}

/// An immutable collection of rows sharing one schema.
///
/// The schema is the set of field names seen across all records, in
/// first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    fields: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from caller records.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut fields: Vec<String> = Vec::new();
        let mut index: BTreeMap<String, usize> = BTreeMap::new();
        let mut pending: Vec<Vec<(usize, Value)>> = Vec::new();

        for record in records {
            let mut cells = Vec::with_capacity(record.len());
            for (name, value) in record {
                let position = match index.get(&name) {
                    Some(&pos) => pos,
                    None => {
                        let pos = fields.len();
                        index.insert(name.clone(), pos);
                        fields.push(name);
                        pos
                    }
                };
                cells.push((position, value));
            }
            pending.push(cells);
        }

        let width = fields.len();
        let rows = pending
            .into_iter()
            .map(|cells| {
                let mut row = vec![None; width];
                for (pos, value) in cells {
                    row[pos] = Some(value);
                }
                Row { cells: row }
            })
            .collect();

        Self { fields, rows }
    }

    /// Field names in schema order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Schema position of a field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    /// Add a field to the schema of an empty dataset and return its position.
    ///
    /// Used so that columns over an empty dataset still resolve.
    pub(crate) fn declare_field(&mut self, name: &str) -> usize {
        match self.field_index(name) {
            Some(pos) => pos,
            None => {
                self.fields.push(name.to_string());
                self.fields.len() - 1
            }
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rebuild the original record for a row.
    pub fn record(&self, row: &Row) -> Record {
        self.fields
            .iter()
            .zip(row.cells.iter())
            .filter_map(|(name, cell)| cell.as_ref().map(|v| (name.clone(), v.clone())))
            .collect()
    }
}
