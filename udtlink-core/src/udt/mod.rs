//! Host type reflection.
//!
//! This module provides the traits and shape descriptors through which host types describe
//! themselves to the metadata engine: their properties, the shape of each property and, for
//! types that carry one, the capability marker naming their remote identity.

#![deny(missing_docs)]

mod r#type;
pub use r#type::Type;

mod shape;
pub use shape::{HostScalar, Marker, ObjectShape, Property, Shape};

// Re-export the Udt derive macro so it's available alongside the trait
pub use udtlink_macros::Udt;

use crate::{Error, Record, Result, Value};

/// A host type that maps to a remote object type.
///
/// Usually derived with `#[derive(Udt)]`, which also implements [`Type`] for the host type so it
/// can be nested in other objects and collected in `Vec`s.
pub trait Udt: Type {
    /// The object's shape: its host name, marker and properties.
    const OBJECT: &'static ObjectShape<'static>;

    /// Flattens the object into a record keyed by property name.
    fn to_record(&self) -> Record;

    /// Rebuilds the object from a record keyed by property name.
    ///
    /// Missing properties are read as [`Value::Null`].
    fn from_record(record: Record) -> Result<Self>;
}

#[doc(hidden)]
pub fn object_to_value<T: Udt>(object: &T) -> Value {
    Value::Object(object.to_record())
}

#[doc(hidden)]
pub fn object_from_value<T: Udt>(value: Value) -> Result<T> {
    match value {
        Value::Object(record) => T::from_record(record),
        other => Err(Error::conversion(T::OBJECT.name(), other)),
    }
}
