//! Remote identity of a UDT: an object type and, optionally, its collection type.

use alloc::{format, string::String};
use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use winnow::{
    ascii::space0,
    combinator::{opt, preceded, separated_pair},
    error::InputError,
    token::{literal, take_while},
    ModalResult, Parser,
};

use crate::{Error, Result};

/// The remote identity of a user-defined type.
///
/// Names an object type (`SCHEMA.OBJECT`) and optionally the collection type whose elements are
/// that object (`SCHEMA.COLLECTION`). All names are normalized to upper case, so identities built
/// from differently-cased but equivalent input compare equal.
///
/// ```
/// use udtlink_core::UdtIdentity;
///
/// let identity: UdtIdentity = "hr.emp|hr.emp_tbl".parse().unwrap();
/// assert_eq!(identity.full_object_name(), "HR.EMP");
/// assert_eq!(identity.full_collection_name().unwrap(), "HR.EMP_TBL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UdtIdentity {
    object_schema: String,
    object_name: String,
    collection: Option<(String, String)>,
}

impl UdtIdentity {
    /// Parse the compact form: `SCHEMA.OBJECT` or `SCHEMA.OBJECT|SCHEMA.COLLECTION`.
    pub fn parse(input: &str) -> Result<Self> {
        let mut bytes = input.trim().as_bytes();
        if bytes.is_empty() {
            return Err(Error::Configuration(String::from(
                "UDT identity must not be empty",
            )));
        }

        match identity(&mut bytes) {
            Ok((object, collection)) if bytes.is_empty() => {
                Ok(Self::normalized(object, collection))
            }
            _ => Err(Error::Configuration(format!(
                "`{input}` is not of the form `SCHEMA.OBJECT[|SCHEMA.COLLECTION]`"
            ))),
        }
    }

    /// Build an identity from discrete fields.
    ///
    /// The collection fields must be either both empty or both non-empty.
    pub fn from_parts(
        object_schema: &str,
        object_name: &str,
        collection_schema: &str,
        collection_name: &str,
    ) -> Result<Self> {
        let object = (segment_part(object_schema)?, segment_part(object_name)?);
        let collection = match (collection_schema.trim(), collection_name.trim()) {
            ("", "") => None,
            (schema, name) if !schema.is_empty() && !name.is_empty() => {
                Some((segment_part(schema)?, segment_part(name)?))
            }
            _ => {
                return Err(Error::Configuration(String::from(
                    "collection schema and collection name must be set together",
                )))
            }
        };

        Ok(Self::normalized(object, collection))
    }

    fn normalized(object: (&str, &str), collection: Option<(&str, &str)>) -> Self {
        Self {
            object_schema: object.0.to_uppercase(),
            object_name: object.1.to_uppercase(),
            collection: collection
                .map(|(schema, name)| (schema.to_uppercase(), name.to_uppercase())),
        }
    }

    /// The schema owning the object type.
    pub fn object_schema(&self) -> &str {
        &self.object_schema
    }

    /// The object type's name.
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// The schema owning the collection type, if one is named.
    pub fn collection_schema(&self) -> Option<&str> {
        self.collection.as_ref().map(|(schema, _)| schema.as_str())
    }

    /// The collection type's name, if one is named.
    pub fn collection_name(&self) -> Option<&str> {
        self.collection.as_ref().map(|(_, name)| name.as_str())
    }

    /// Whether a collection type is named.
    pub fn is_collection_valid(&self) -> bool {
        self.collection.is_some()
    }

    /// `SCHEMA.OBJECT`.
    pub fn full_object_name(&self) -> String {
        format!("{}.{}", self.object_schema, self.object_name)
    }

    /// `SCHEMA.COLLECTION`, or a [`Error::Configuration`] if no collection is named.
    pub fn full_collection_name(&self) -> Result<String> {
        match &self.collection {
            Some((schema, name)) => Ok(format!("{schema}.{name}")),
            None => Err(Error::Configuration(format!(
                "UDT `{}` has no collection type",
                self.full_object_name()
            ))),
        }
    }
}

impl fmt::Display for UdtIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.object_schema, self.object_name)?;
        if let Some((schema, name)) = &self.collection {
            write!(f, "|{schema}.{name}")?;
        }
        Ok(())
    }
}

impl FromStr for UdtIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for UdtIdentity {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl Serialize for UdtIdentity {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UdtIdentity {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

type Input<'a> = &'a [u8];
type Name<'a> = (&'a str, &'a str);

/// Parse one identifier segment: letters, digits, `_`, `$` and `#`.
fn segment<'a>(input: &mut Input<'a>) -> ModalResult<&'a str, InputError<Input<'a>>> {
    take_while(1.., |b: u8| {
        b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'#')
    })
    .map(|bytes: &'a [u8]| core::str::from_utf8(bytes).unwrap_or_default())
    .parse_next(input)
}

/// Parse `SCHEMA.NAME`.
fn qualified_name<'a>(input: &mut Input<'a>) -> ModalResult<Name<'a>, InputError<Input<'a>>> {
    separated_pair(segment, literal("."), segment).parse_next(input)
}

/// Parse `SCHEMA.OBJECT[|SCHEMA.COLLECTION]`.
fn identity<'a>(
    input: &mut Input<'a>,
) -> ModalResult<(Name<'a>, Option<Name<'a>>), InputError<Input<'a>>> {
    (
        qualified_name,
        opt(preceded((space0, literal("|"), space0), qualified_name)),
    )
        .parse_next(input)
}

/// Validate a single discrete field.
fn segment_part(part: &str) -> Result<&str> {
    let trimmed = part.trim();
    let mut bytes = trimmed.as_bytes();
    match segment(&mut bytes) {
        Ok(name) if bytes.is_empty() => Ok(name),
        _ => Err(Error::Configuration(format!(
            "`{part}` is not a valid UDT name segment"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_only() {
        let identity = UdtIdentity::parse("HR.EMP").unwrap();
        assert_eq!(identity.object_schema(), "HR");
        assert_eq!(identity.object_name(), "EMP");
        assert!(!identity.is_collection_valid());
        assert_eq!(identity.collection_schema(), None);
        assert!(matches!(
            identity.full_collection_name(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn object_and_collection() {
        let identity = UdtIdentity::parse("hr.emp|hr.emp_tbl").unwrap();
        assert_eq!(identity.full_object_name(), "HR.EMP");
        assert_eq!(identity.collection_schema(), Some("HR"));
        assert_eq!(identity.collection_name(), Some("EMP_TBL"));
        assert_eq!(identity.to_string(), "HR.EMP|HR.EMP_TBL");
    }

    #[test]
    fn whitespace_is_tolerated() {
        let identity = UdtIdentity::parse("  hr.emp | hr.emp_tbl ").unwrap();
        assert_eq!(identity.full_collection_name().unwrap(), "HR.EMP_TBL");
    }

    #[test]
    fn invalid_identities() {
        for input in ["EMP", "", "HR.", ".EMP", "HR.EMP.X", "HR.EMP|", "HR.EMP|TBL", "HR EMP"] {
            assert!(
                matches!(UdtIdentity::parse(input), Err(Error::Configuration(_))),
                "`{input}` should be rejected"
            );
        }
    }

    #[test]
    fn equivalent_constructions() {
        let compact = UdtIdentity::parse("Hr.Emp|HR.emp_TBL").unwrap();
        let parts = UdtIdentity::from_parts("hr", "EMP", "hr", "Emp_Tbl").unwrap();
        assert_eq!(compact, parts);

        let object_only = UdtIdentity::from_parts("HR", "emp", "", "").unwrap();
        assert_eq!(object_only, UdtIdentity::parse("hr.EMP").unwrap());
        assert_ne!(object_only, compact);
    }

    #[test]
    fn half_collection_is_rejected() {
        assert!(matches!(
            UdtIdentity::from_parts("HR", "EMP", "HR", ""),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            UdtIdentity::from_parts("", "EMP", "", ""),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn serde_uses_compact_form() {
        let identity = UdtIdentity::parse("hr.emp|hr.emp_tbl").unwrap();
        let json = serde_json::to_string(&identity).unwrap();
        assert_eq!(json, r#""HR.EMP|HR.EMP_TBL""#);

        let back: UdtIdentity = serde_json::from_str(r#""hr.emp|hr.emp_tbl""#).unwrap();
        assert_eq!(back, identity);
        assert!(serde_json::from_str::<UdtIdentity>(r#""HR.""#).is_err());
    }
}
