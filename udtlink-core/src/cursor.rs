//! The cursor collaborator.

use crate::{Result, Value};

/// A forward-only row reader over a returned ref cursor, implemented by the driver integration.
///
/// Nested objects arrive as [`Value::Object`] records keyed by remote attribute name and nested
/// collections as [`Value::Collection`]s of such records.
pub trait Cursor {
    /// Moves to the next row. Returns `false` once the rows are exhausted.
    fn advance(&mut self) -> Result<bool>;

    /// The number of columns.
    fn field_count(&self) -> usize;

    /// The name of the column at `ordinal`.
    fn field_name(&self, ordinal: usize) -> Result<&str>;

    /// The current row's value at `ordinal`.
    fn value(&self, ordinal: usize) -> Result<Value>;
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn advance(&mut self) -> Result<bool> {
        (**self).advance()
    }

    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn field_name(&self, ordinal: usize) -> Result<&str> {
        (**self).field_name(ordinal)
    }

    fn value(&self, ordinal: usize) -> Result<Value> {
        (**self).value(ordinal)
    }
}
