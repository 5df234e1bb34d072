use super::GtfsRecord;
use crate::reconcile::ReconcileError;
use itertools::Itertools;

/// an ordered set of column names plus the rows of one GTFS file.
///
/// two tables of the same kind may carry different columns; the column list
/// is the schema used when the table is written back out, and any column a
/// row does not carry is written as an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    columns: Vec<String>,
    rows: Vec<R>,
}

impl<R: GtfsRecord> Table<R> {
    /// an empty table with the given schema.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: vec![],
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<R>) -> Self {
        Self { columns, rows }
    }

    /// builds a table from raw string rows as read from a delimited file.
    /// rows shorter than the header are padded with empty values, rows longer
    /// than the header are rejected. the key column must be present.
    pub fn from_string_rows(
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, ReconcileError> {
        let mut table = Self::new(columns);
        table.require_key_column()?;
        for (idx, values) in rows.into_iter().enumerate() {
            if values.len() > table.columns.len() {
                return Err(ReconcileError::MalformedRow {
                    kind: R::KIND,
                    row: idx,
                    expected: table.columns.len(),
                    found: values.len(),
                });
            }
            let padded = values
                .into_iter()
                .chain(std::iter::repeat(String::new()))
                .take(table.columns.len());
            let record = R::from_fields(table.columns.iter().map(String::as_str).zip(padded));
            table.rows.push(record);
        }
        Ok(table)
    }

    /// builds a table from string literals, first row is the header.
    pub fn from_str_rows(rows: &[&[&str]]) -> Result<Self, ReconcileError> {
        let (header, body) = match rows.split_first() {
            Some(split) => split,
            None => {
                return Err(ReconcileError::MissingKeyColumn {
                    kind: R::KIND,
                    column: R::KIND.key_column().to_string(),
                })
            }
        };
        let columns = header.iter().map(|c| c.to_string()).collect_vec();
        let values = body
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect_vec())
            .collect_vec();
        Self::from_string_rows(columns, values)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// fails if the key column for this kind of table is not in the schema.
    pub fn require_key_column(&self) -> Result<(), ReconcileError> {
        let key = R::KIND.key_column();
        if self.has_column(key) {
            Ok(())
        } else {
            Err(ReconcileError::MissingKeyColumn {
                kind: R::KIND,
                column: key.to_string(),
            })
        }
    }

    /// fails on the first column this kind of table requires that is not in the schema.
    pub fn require_columns(&self) -> Result<(), ReconcileError> {
        self.require_key_column()?;
        match R::KIND
            .required_columns()
            .iter()
            .find(|c| !self.has_column(c))
        {
            None => Ok(()),
            Some(column) => Err(ReconcileError::MissingColumn {
                kind: R::KIND,
                column: column.to_string(),
            }),
        }
    }

    /// value of a column on a row as it would be written: columns the row
    /// does not carry are empty.
    pub fn value<'a>(row: &'a R, column: &str) -> &'a str {
        row.get(column).unwrap_or_default()
    }

    /// the values of a row in schema order.
    pub fn row_values<'a>(&'a self, row: &'a R) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|c| Self::value(row, c))
            .collect_vec()
    }

    /// first row whose value for `column` equals `value`.
    pub fn find(&self, column: &str, value: &str) -> Option<&R> {
        self.rows.iter().find(|r| Self::value(r, column) == value)
    }

    pub fn find_by_key(&self, key: &str) -> Option<&R> {
        self.rows.iter().find(|r| r.key() == key)
    }

    pub fn find_by_key_mut(&mut self, key: &str) -> Option<&mut R> {
        self.rows.iter_mut().find(|r| r.key() == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.key())
    }

    /// appends a row. columns the row carries that are not in the schema
    /// are not written.
    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    /// sets one value on the row with the given key. returns false if
    /// no row has that key.
    pub fn update(&mut self, key: &str, column: &str, value: String) -> bool {
        match self.find_by_key_mut(key) {
            Some(row) => {
                row.set(column, value);
                true
            }
            None => false,
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<R>) {
        (self.columns, self.rows)
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
