//! An in-memory cursor.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use crate::{Cursor, Error, Result, Value};

/// A cursor over pre-loaded rows.
///
/// All rows share the column list given at construction.
#[derive(Debug)]
#[doc(hidden)]
pub(crate) struct MockCursor {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    // Index of the next row to move to.
    next: usize,
}

impl MockCursor {
    /// Create a cursor with the given column names and rows.
    pub(crate) fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows,
            next: 0,
        }
    }

    fn current(&self) -> Result<&[Value]> {
        self.next
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .map(Vec::as_slice)
            .ok_or_else(|| Error::Driver("cursor is not positioned on a row".into()))
    }
}

impl Cursor for MockCursor {
    fn advance(&mut self) -> Result<bool> {
        if self.next < self.rows.len() {
            self.next += 1;
            Ok(true)
        } else {
            self.next = self.rows.len() + 1;
            Ok(false)
        }
    }

    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn field_name(&self, ordinal: usize) -> Result<&str> {
        self.columns
            .get(ordinal)
            .map(String::as_str)
            .ok_or_else(|| Error::Driver("column ordinal out of range".into()))
    }

    fn value(&self, ordinal: usize) -> Result<Value> {
        self.current()?
            .get(ordinal)
            .cloned()
            .ok_or_else(|| Error::Driver("column ordinal out of range".into()))
    }
}
