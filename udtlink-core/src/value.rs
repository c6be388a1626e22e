//! Dynamic values exchanged between host objects, bind parameters and cursors.

use alloc::{string::String, vec::Vec};

use bytes::Bytes;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// A single value, either on the host side or as read from the remote database.
///
/// Host objects flatten into [`Value::Object`] records keyed by property name; cursor rows and
/// nested remote objects arrive as records keyed by remote attribute name.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// SQL `NULL` or an absent host value.
    #[default]
    Null,
    /// A single character.
    Char(char),
    /// A signed byte.
    Byte(i8),
    /// A 16-bit integer.
    Int16(i16),
    /// A 32-bit integer.
    Int32(i32),
    /// A 64-bit integer.
    Int64(i64),
    /// A single-precision float.
    Single(f32),
    /// A double-precision float.
    Double(f64),
    /// A fixed-point decimal.
    Decimal(Decimal),
    /// A date and time.
    Date(NaiveDateTime),
    /// A boolean.
    Boolean(bool),
    /// A byte sequence.
    Bytes(Bytes),
    /// Text.
    Text(String),
    /// An object, as an ordered name to value record.
    Object(Record),
    /// A collection of objects.
    Collection(Vec<Value>),
}

impl Value {
    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// A short name of the variant, used in diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Char(_) => "char",
            Value::Byte(_) => "byte",
            Value::Int16(_) => "int16",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Single(_) => "single",
            Value::Double(_) => "double",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::Boolean(_) => "boolean",
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Object(_) => "object",
            Value::Collection(_) => "collection",
        }
    }
}

/// An ordered set of named values making up one object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty record with room for `capacity` fields.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    /// Sets a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Builder-style [`Record::insert`].
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// The value of a field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Removes a field, returning [`Value::Null`] if it was absent.
    pub fn take(&mut self, name: &str) -> Value {
        self.fields.shift_remove(name).unwrap_or_default()
    }

    /// The number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<N: Into<String>> FromIterator<(N, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
