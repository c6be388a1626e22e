//! Remote scalar kinds and the host scalar to remote kind table.

use core::fmt;

use crate::{udt::HostScalar, Direction, Value};

/// Text longer than this many UTF-16 code units is bound as [`OracleDbType::Clob`].
pub const MAX_VARCHAR2_LENGTH: usize = 32000;

/// Remote kinds understood by the native parameter binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OracleDbType {
    /// Single character.
    Char,
    /// Signed byte.
    Byte,
    /// 16-bit integer.
    Int16,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
    /// `BINARY_FLOAT`.
    Single,
    /// `BINARY_DOUBLE`.
    Double,
    /// `NUMBER` without precision.
    Decimal,
    /// `DATE`.
    Date,
    /// Boolean, as understood by the driver.
    Boolean,
    /// Binary large object.
    Blob,
    /// Bounded text.
    Varchar2,
    /// Unbounded text.
    Clob,
    /// A cursor returned as an output parameter.
    RefCursor,
}

impl OracleDbType {
    /// The remote kind a host scalar binds as.
    ///
    /// Returns `None` for host types outside the table; those bind without an explicit kind and
    /// the driver infers one from the value.
    pub const fn for_scalar(scalar: HostScalar) -> Option<Self> {
        match scalar {
            HostScalar::Char => Some(OracleDbType::Char),
            HostScalar::Byte => Some(OracleDbType::Byte),
            HostScalar::Int16 => Some(OracleDbType::Int16),
            HostScalar::Int32 => Some(OracleDbType::Int32),
            HostScalar::Int64 => Some(OracleDbType::Int64),
            HostScalar::Single => Some(OracleDbType::Single),
            HostScalar::Double => Some(OracleDbType::Double),
            HostScalar::Decimal => Some(OracleDbType::Decimal),
            HostScalar::Date => Some(OracleDbType::Date),
            HostScalar::Boolean => Some(OracleDbType::Boolean),
            HostScalar::Bytes => Some(OracleDbType::Blob),
            HostScalar::Text => Some(OracleDbType::Varchar2),
            HostScalar::UInt8 | HostScalar::UInt16 | HostScalar::UInt32 | HostScalar::UInt64 => {
                None
            }
        }
    }

    /// The SQL type used for an attribute of this kind in a `CREATE TYPE` statement.
    pub const fn sql_type(&self) -> &'static str {
        match self {
            OracleDbType::Char => "CHAR(1)",
            OracleDbType::Byte => "NUMBER(3)",
            OracleDbType::Int16 => "NUMBER(5)",
            OracleDbType::Int32 => "NUMBER(10)",
            OracleDbType::Int64 => "NUMBER(19)",
            OracleDbType::Single => "BINARY_FLOAT",
            OracleDbType::Double => "BINARY_DOUBLE",
            OracleDbType::Decimal => "NUMBER",
            OracleDbType::Date => "DATE",
            OracleDbType::Boolean => "NUMBER(1)",
            OracleDbType::Blob => "BLOB",
            OracleDbType::Varchar2 => "VARCHAR2(4000)",
            OracleDbType::Clob => "CLOB",
            OracleDbType::RefCursor => "SYS_REFCURSOR",
        }
    }

    /// The PL/SQL type of a variable holding a value of this kind.
    pub const fn variable_type(&self) -> &'static str {
        match self {
            OracleDbType::Varchar2 => "VARCHAR2(32767)",
            other => other.sql_type(),
        }
    }
}

impl fmt::Display for OracleDbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The kind and size a scalar value binds with.
///
/// Text promotes to [`OracleDbType::Clob`] with unbounded size once it is longer than
/// [`MAX_VARCHAR2_LENGTH`] UTF-16 code units. Output text reserves the full bounded size.
pub(crate) fn native_binding(
    scalar: HostScalar,
    direction: Direction,
    value: &Value,
) -> (Option<OracleDbType>, Option<usize>) {
    match (OracleDbType::for_scalar(scalar), value) {
        (Some(OracleDbType::Varchar2), Value::Text(text)) => {
            let length = text.encode_utf16().count();
            if length > MAX_VARCHAR2_LENGTH {
                (Some(OracleDbType::Clob), None)
            } else if direction.has_output() {
                (Some(OracleDbType::Varchar2), Some(MAX_VARCHAR2_LENGTH))
            } else {
                (Some(OracleDbType::Varchar2), Some(length))
            }
        }
        (Some(OracleDbType::Varchar2), _) => {
            (Some(OracleDbType::Varchar2), Some(MAX_VARCHAR2_LENGTH))
        }
        (kind, _) => (kind, None),
    }
}
