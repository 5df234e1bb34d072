use super::TableKind;
use std::fmt::Debug;

/// a row of a GTFS table. implementations hold the fields the reconciliation
/// reasons about as typed members and carry every other column in an open
/// attribute map, so unknown columns pass through untouched.
pub trait GtfsRecord: Clone + Debug + Default + PartialEq {
    /// the table this record belongs to.
    const KIND: TableKind;

    /// value of the key column for this row.
    fn key(&self) -> &str;

    /// value of some column on this row. typed optional fields report an
    /// empty string when unset, attribute columns report `None` when the
    /// row never carried them.
    fn get(&self, column: &str) -> Option<&str>;

    /// assigns a column value, routing known columns to their typed field.
    fn set(&mut self, column: &str, value: String);

    /// builds a record from (column, value) pairs.
    fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut record = Self::default();
        for (column, value) in fields {
            record.set(column, value);
        }
        record
    }
}

/// empty strings are the GTFS encoding of "no value".
pub(crate) fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
