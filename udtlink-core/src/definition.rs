//! Remote type-shape definitions.

use alloc::{format, string::String, vec::Vec};
use core::fmt;

use crate::{OracleDbType, UdtIdentity};

/// The kind of a remote attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    /// A scalar. `None` when the host type is outside the kind table.
    Scalar(Option<OracleDbType>),
    /// A nested object type, by full name.
    Object(String),
    /// A nested collection type, by full name.
    Collection(String),
    /// An attribute no host property maps to.
    Unknown,
}

/// One attribute of a remote object type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    name: String,
    kind: AttributeKind,
}

impl AttributeDefinition {
    /// Creates an attribute definition.
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The attribute's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute's kind.
    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }
}

impl fmt::Display for AttributeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AttributeKind::Scalar(Some(kind)) => write!(f, "{} {}", self.name, kind.sql_type()),
            AttributeKind::Scalar(None) => write!(f, "{} NUMBER", self.name),
            AttributeKind::Object(name) | AttributeKind::Collection(name) => {
                write!(f, "{} {name}", self.name)
            }
            AttributeKind::Unknown => write!(f, "{} ANYDATA", self.name),
        }
    }
}

/// The shape of a remote object type: its identity and ordered attributes.
///
/// Shared by every host type mapping to the same remote object with the same shape. `Display`
/// renders the object type's DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdtDefinition {
    identity: UdtIdentity,
    attributes: Vec<AttributeDefinition>,
}

impl UdtDefinition {
    /// Creates a definition.
    pub fn new(identity: UdtIdentity, attributes: Vec<AttributeDefinition>) -> Self {
        Self {
            identity,
            attributes,
        }
    }

    /// The remote identity.
    pub fn identity(&self) -> &UdtIdentity {
        &self.identity
    }

    /// The attributes, in remote order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter()
    }

    /// The attribute names, in remote order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes
            .iter()
            .map(|attribute| attribute.name.clone())
            .collect()
    }

    /// Looks up an attribute by name, case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
    }

    /// The collection type's DDL, if the identity names a collection.
    pub fn collection_ddl(&self) -> Option<String> {
        let collection = self.identity.full_collection_name().ok()?;
        Some(format!(
            "CREATE OR REPLACE TYPE {collection} AS TABLE OF {}",
            self.identity.full_object_name()
        ))
    }
}

impl fmt::Display for UdtDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CREATE OR REPLACE TYPE {} AS OBJECT (",
            self.identity.full_object_name()
        )?;
        for (i, attribute) in self.attributes.iter().enumerate() {
            let separator = if i + 1 < self.attributes.len() { "," } else { "" };
            write!(f, "\n  {attribute}{separator}")?;
        }
        write!(f, "\n)")
    }
}
