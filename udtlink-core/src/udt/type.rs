use alloc::{string::String, vec::Vec};

use bytes::Bytes;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use super::{HostScalar, Shape, Udt};
use crate::{convert::coerce, Error, Result, Value};

/// Host type reflection and conversion.
pub trait Type: Sized {
    /// The type's shape.
    const SHAPE: &'static Shape<'static>;

    /// Converts the host value into a [`Value`].
    fn to_value(&self) -> Value;

    /// Converts a [`Value`] back into the host value, coercing scalars where possible.
    fn from_value(value: Value) -> Result<Self>;
}

/// Implements `Type` for a scalar whose canonical value is one `Value` variant.
macro_rules! impl_scalar {
    ($ty:ty => $scalar:ident, $variant:ident) => {
        impl Type for $ty {
            const SHAPE: &'static Shape<'static> = &Shape::Scalar(HostScalar::$scalar);

            fn to_value(&self) -> Value {
                Value::$variant(self.clone().into())
            }

            fn from_value(value: Value) -> Result<Self> {
                match coerce(HostScalar::$scalar, value)? {
                    Value::$variant(v) => <$ty>::try_from(v)
                        .map_err(|_| Error::conversion(HostScalar::$scalar.name(), stringify!($variant))),
                    other => Err(Error::conversion(HostScalar::$scalar.name(), other)),
                }
            }
        }
    };
}

impl_scalar!(char => Char, Char);
impl_scalar!(i8 => Byte, Byte);
impl_scalar!(i16 => Int16, Int16);
impl_scalar!(i32 => Int32, Int32);
impl_scalar!(i64 => Int64, Int64);
impl_scalar!(f32 => Single, Single);
impl_scalar!(f64 => Double, Double);
impl_scalar!(Decimal => Decimal, Decimal);
impl_scalar!(NaiveDateTime => Date, Date);
impl_scalar!(bool => Boolean, Boolean);
impl_scalar!(Bytes => Bytes, Bytes);
impl_scalar!(String => Text, Text);
// Unsigned integers are outside the remote kind table and travel in the next wider variant.
impl_scalar!(u8 => UInt8, Int16);
impl_scalar!(u16 => UInt16, Int32);
impl_scalar!(u32 => UInt32, Int64);
impl_scalar!(u64 => UInt64, Decimal);

impl Type for NaiveDate {
    const SHAPE: &'static Shape<'static> = &Shape::Scalar(HostScalar::Date);

    fn to_value(&self) -> Value {
        Value::Date(self.and_time(NaiveTime::MIN))
    }

    fn from_value(value: Value) -> Result<Self> {
        NaiveDateTime::from_value(value).map(|date| date.date())
    }
}

impl<T: Type> Type for Option<T> {
    const SHAPE: &'static Shape<'static> = &Shape::Optional(T::SHAPE);

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

impl<T: Udt> Type for Vec<T> {
    const SHAPE: &'static Shape<'static> = &Shape::Collection(T::OBJECT);

    fn to_value(&self) -> Value {
        Value::Collection(self.iter().map(Type::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            // A `NULL` collection reads as an empty one.
            Value::Null => Ok(Vec::new()),
            Value::Collection(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::conversion("collection", other)),
        }
    }
}
