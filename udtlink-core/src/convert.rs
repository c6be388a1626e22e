//! Coercion of raw remote values into the canonical value of a host scalar type.

use alloc::string::{String, ToString};
use core::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::{udt::HostScalar, Error, Result, Value};

/// Coerce `raw` into the variant `scalar` is represented by.
///
/// `NULL` stays `NULL`; whether it is acceptable is up to the host type.
pub fn coerce(scalar: HostScalar, raw: Value) -> Result<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let expected = scalar.name();
    let value = match scalar {
        HostScalar::Char => match raw {
            Value::Char(c) => Value::Char(c),
            Value::Text(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Value::Char(c),
                    _ => return Err(Error::conversion(expected, text)),
                }
            }
            other => return Err(Error::conversion(expected, other)),
        },
        HostScalar::Byte => Value::Byte(integer(expected, raw)?),
        HostScalar::Int16 => Value::Int16(integer(expected, raw)?),
        HostScalar::Int32 => Value::Int32(integer(expected, raw)?),
        HostScalar::Int64 => Value::Int64(integer(expected, raw)?),
        HostScalar::UInt8 => Value::Int16(integer::<u8>(expected, raw)?.into()),
        HostScalar::UInt16 => Value::Int32(integer::<u16>(expected, raw)?.into()),
        HostScalar::UInt32 => Value::Int64(integer::<u32>(expected, raw)?.into()),
        HostScalar::UInt64 => Value::Decimal(integer::<u64>(expected, raw)?.into()),
        HostScalar::Single => Value::Single(float(expected, raw)? as f32),
        HostScalar::Double => Value::Double(float(expected, raw)?),
        HostScalar::Decimal => Value::Decimal(decimal(expected, raw)?),
        HostScalar::Date => match raw {
            Value::Date(date) => Value::Date(date),
            Value::Text(text) => match NaiveDateTime::from_str(text.trim()) {
                Ok(date) => Value::Date(date),
                Err(_) => return Err(Error::conversion(expected, text)),
            },
            other => return Err(Error::conversion(expected, other)),
        },
        HostScalar::Boolean => match raw {
            Value::Boolean(b) => Value::Boolean(b),
            Value::Text(text) if text.eq_ignore_ascii_case("true") => Value::Boolean(true),
            Value::Text(text) if text.eq_ignore_ascii_case("false") => Value::Boolean(false),
            other => match integer::<i8>(expected, other)? {
                0 => Value::Boolean(false),
                1 => Value::Boolean(true),
                n => return Err(Error::conversion(expected, n)),
            },
        },
        HostScalar::Bytes => match raw {
            Value::Bytes(bytes) => Value::Bytes(bytes),
            other => return Err(Error::conversion(expected, other)),
        },
        HostScalar::Text => match raw {
            Value::Text(text) => Value::Text(text),
            Value::Char(c) => Value::Text(String::from(c)),
            Value::Decimal(d) => Value::Text(d.to_string()),
            Value::Int64(n) => Value::Text(n.to_string()),
            Value::Int32(n) => Value::Text(n.to_string()),
            Value::Int16(n) => Value::Text(n.to_string()),
            other => return Err(Error::conversion(expected, other)),
        },
    };

    Ok(value)
}

/// Decode the tri-state numeric encoding of a boolean: `1`, `0` or `NULL`.
pub(crate) fn decode_tristate(raw: Value) -> Result<Option<bool>> {
    match coerce(HostScalar::Int16, raw)? {
        Value::Null => Ok(None),
        Value::Int16(1) => Ok(Some(true)),
        Value::Int16(0) => Ok(Some(false)),
        other => Err(Error::conversion("tri-state boolean (1, 0 or NULL)", other)),
    }
}

fn integer<T: TryFrom<i128>>(expected: &'static str, raw: Value) -> Result<T> {
    let wide: i128 = match raw {
        Value::Byte(n) => n.into(),
        Value::Int16(n) => n.into(),
        Value::Int32(n) => n.into(),
        Value::Int64(n) => n.into(),
        Value::Decimal(d) if d.fract().is_zero() => match d.to_i128() {
            Some(n) => n,
            None => return Err(Error::conversion(expected, d)),
        },
        Value::Double(f) if f.is_finite() && f.fract() == 0.0 => f as i128,
        Value::Single(f) if f.is_finite() && f.fract() == 0.0 => f as i128,
        Value::Text(text) => match text.trim().parse::<i128>() {
            Ok(n) => n,
            Err(_) => return Err(Error::conversion(expected, text)),
        },
        other => return Err(Error::conversion(expected, other)),
    };

    T::try_from(wide).map_err(|_| Error::conversion(expected, wide))
}

fn float(expected: &'static str, raw: Value) -> Result<f64> {
    match raw {
        Value::Single(f) => Ok(f.into()),
        Value::Double(f) => Ok(f),
        Value::Byte(n) => Ok(n.into()),
        Value::Int16(n) => Ok(n.into()),
        Value::Int32(n) => Ok(n.into()),
        Value::Int64(n) => Ok(n as f64),
        Value::Decimal(d) => d.to_f64().ok_or_else(|| Error::conversion(expected, d)),
        Value::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| Error::conversion(expected, text)),
        other => Err(Error::conversion(expected, other)),
    }
}

fn decimal(expected: &'static str, raw: Value) -> Result<Decimal> {
    match raw {
        Value::Decimal(d) => Ok(d),
        Value::Byte(n) => Ok(n.into()),
        Value::Int16(n) => Ok(n.into()),
        Value::Int32(n) => Ok(n.into()),
        Value::Int64(n) => Ok(n.into()),
        Value::Single(f) => Decimal::try_from(f).map_err(|_| Error::conversion(expected, f)),
        Value::Double(f) => Decimal::try_from(f).map_err(|_| Error::conversion(expected, f)),
        Value::Text(text) => {
            Decimal::from_str(text.trim()).map_err(|_| Error::conversion(expected, text))
        }
        other => Err(Error::conversion(expected, other)),
    }
}
