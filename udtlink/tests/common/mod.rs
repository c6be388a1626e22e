//! A stand-in for the database side of a call.

#![allow(dead_code)]

use udtlink::{Cursor, Error, Record, Result, Value};

/// Placeholder numbers in order of appearance in `text`.
pub fn placeholders(text: &str) -> Vec<u32> {
    let mut numbers = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(':') {
        rest = &rest[start + 1..];
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if let Ok(number) = digits.parse() {
            numbers.push(number);
        }
    }

    numbers
}

/// A cursor over in-memory rows.
#[derive(Debug)]
pub struct RowCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Vec<Value>>,
    current: Option<Vec<Value>>,
}

impl RowCursor {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows: rows.into_iter(),
            current: None,
        }
    }

    /// A cursor whose rows are `records`, with columns in the first record's order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns: Vec<String> = records
            .first()
            .map(|record| record.iter().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default();
        let rows: Vec<Vec<Value>> = records
            .into_iter()
            .map(|record| record.into_iter().map(|(_, value)| value).collect())
            .collect();

        Self {
            columns,
            rows: rows.into_iter(),
            current: None,
        }
    }
}

impl Cursor for RowCursor {
    fn advance(&mut self) -> Result<bool> {
        self.current = self.rows.next();
        Ok(self.current.is_some())
    }

    fn field_count(&self) -> usize {
        self.columns.len()
    }

    fn field_name(&self, ordinal: usize) -> Result<&str> {
        self.columns
            .get(ordinal)
            .map(String::as_str)
            .ok_or_else(|| Error::Driver(format!("no column {ordinal}").into()))
    }

    fn value(&self, ordinal: usize) -> Result<Value> {
        self.current
            .as_ref()
            .and_then(|row| row.get(ordinal))
            .cloned()
            .ok_or_else(|| Error::Driver(format!("no value at {ordinal}").into()))
    }
}
