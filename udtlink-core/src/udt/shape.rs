use core::fmt;

/// The shape of a host value, as seen by the metadata engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape<'a> {
    /// A scalar.
    Scalar(HostScalar),
    /// A nullable value.
    Optional(&'a Shape<'a>),
    /// A nested object.
    Object(&'a ObjectShape<'a>),
    /// A collection of objects.
    Collection(&'a ObjectShape<'a>),
}

impl<'a> Shape<'a> {
    /// The shape with any [`Shape::Optional`] wrappers removed.
    pub const fn required(&self) -> &Shape<'a> {
        match self {
            Shape::Optional(inner) => inner.required(),
            other => other,
        }
    }
}

/// Host scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostScalar {
    /// `char`.
    Char,
    /// `i8`.
    Byte,
    /// `i16`.
    Int16,
    /// `i32`.
    Int32,
    /// `i64`.
    Int64,
    /// `f32`.
    Single,
    /// `f64`.
    Double,
    /// `rust_decimal::Decimal`.
    Decimal,
    /// `chrono::NaiveDateTime` and `chrono::NaiveDate`.
    Date,
    /// `bool`.
    Boolean,
    /// `bytes::Bytes`.
    Bytes,
    /// `String`.
    Text,
    /// `u8`.
    UInt8,
    /// `u16`.
    UInt16,
    /// `u32`.
    UInt32,
    /// `u64`.
    UInt64,
}

impl HostScalar {
    /// The host type's name.
    pub const fn name(&self) -> &'static str {
        match self {
            HostScalar::Char => "char",
            HostScalar::Byte => "i8",
            HostScalar::Int16 => "i16",
            HostScalar::Int32 => "i32",
            HostScalar::Int64 => "i64",
            HostScalar::Single => "f32",
            HostScalar::Double => "f64",
            HostScalar::Decimal => "Decimal",
            HostScalar::Date => "NaiveDateTime",
            HostScalar::Boolean => "bool",
            HostScalar::Bytes => "Bytes",
            HostScalar::Text => "String",
            HostScalar::UInt8 => "u8",
            HostScalar::UInt16 => "u16",
            HostScalar::UInt32 => "u32",
            HostScalar::UInt64 => "u64",
        }
    }
}

/// The capability marker through which a host type names its remote identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker<'a> {
    identity: &'a str,
    attributes: &'a [&'a str],
    strict: bool,
}

impl<'a> Marker<'a> {
    /// Creates a marker.
    ///
    /// `identity` is `SCHEMA.OBJECT` or `SCHEMA.OBJECT|SCHEMA.COLLECTION`. `attributes` lists the
    /// remote object's attributes in order, or is empty when they follow the host properties.
    /// `strict` disables fuzzy property matching.
    pub const fn new(identity: &'a str, attributes: &'a [&'a str], strict: bool) -> Self {
        Self {
            identity,
            attributes,
            strict,
        }
    }

    /// The identity string.
    pub const fn identity(&self) -> &'a str {
        self.identity
    }

    /// The declared remote attributes.
    pub const fn attributes(&self) -> &'a [&'a str] {
        self.attributes
    }

    /// Whether fuzzy matching is disabled.
    pub const fn is_strict(&self) -> bool {
        self.strict
    }
}

/// A host property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property<'a> {
    name: &'a str,
    shape: &'a Shape<'a>,
}

impl<'a> Property<'a> {
    /// Creates a property.
    pub const fn new(name: &'a str, shape: &'a Shape<'a>) -> Self {
        Self { name, shape }
    }

    /// The property's name.
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The property's shape.
    pub const fn shape(&self) -> &'a Shape<'a> {
        self.shape
    }
}

impl fmt::Display for Property<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.name, self.shape.required())
    }
}

/// The shape of a host object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectShape<'a> {
    name: &'a str,
    marker: Option<&'a Marker<'a>>,
    properties: &'a [&'a Property<'a>],
}

impl<'a> ObjectShape<'a> {
    /// Creates an object shape.
    ///
    /// `name` is the host type's fully-qualified name and keys the metadata registry.
    pub const fn new(
        name: &'a str,
        marker: Option<&'a Marker<'a>>,
        properties: &'a [&'a Property<'a>],
    ) -> Self {
        Self {
            name,
            marker,
            properties,
        }
    }

    /// The host type's fully-qualified name.
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The capability marker, if the host type declares one.
    pub const fn marker(&self) -> Option<&'a Marker<'a>> {
        self.marker
    }

    /// The properties, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = &'a Property<'a>> {
        self.properties.iter().copied()
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&'a Property<'a>> {
        self.properties().find(|p| p.name == name)
    }
}

impl fmt::Display for ObjectShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.name)?;
        let mut first = true;
        for property in self.properties() {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{property}")?;
        }
        write!(f, ")")
    }
}
