use alloc::{boxed::Box, string::String};

/// The Error type for the udtlink crate.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A malformed or incomplete UDT identity.
    Configuration(String),
    /// No identity could be resolved for a host type, neither from its marker nor from a preset.
    UnmappedType(String),
    /// A host property has no corresponding remote attribute, even after fuzzy matching, or its
    /// attribute already corresponds to another property.
    PropertyCorrespondence {
        /// Fully-qualified name of the host type.
        host_type: String,
        /// Name of the unmatched host property.
        property: String,
    },
    /// A remote value could not be coerced to the declared host type.
    Conversion {
        /// Description of the expected host type.
        expected: &'static str,
        /// Description of the value that was received.
        found: String,
    },
    /// A parameter received a second post-execution value.
    OutputAlreadyApplied(String),
    /// A post-execution value does not fit the parameter (wrong direction or wrong raw shape).
    UnexpectedOutput(String),
    /// Error deserializing a preset configuration from JSON.
    Json(serde_json::Error),
    /// An error reported by an external collaborator (cursor or bind sink).
    Driver(Box<dyn core::error::Error + Send + Sync>),
}

/// The Result type for the udtlink crate.
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub(crate) fn conversion(expected: &'static str, found: impl core::fmt::Debug) -> Self {
        Error::Conversion {
            expected,
            found: alloc::format!("{found:?}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            Error::Driver(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Configuration(e) => write!(f, "Invalid UDT configuration: {e}"),
            Error::UnmappedType(ty) => write!(f, "No UDT identity is known for type `{ty}`"),
            Error::PropertyCorrespondence {
                host_type,
                property,
            } => write!(
                f,
                "Property `{property}` of `{host_type}` has no corresponding UDT attribute"
            ),
            Error::Conversion { expected, found } => {
                write!(f, "Cannot convert {found} to {expected}")
            }
            Error::OutputAlreadyApplied(name) => {
                write!(f, "Parameter `{name}` already received its output value")
            }
            Error::UnexpectedOutput(e) => write!(f, "Unexpected output value: {e}"),
            Error::Json(e) => write!(f, "Error deserializing from JSON: {e}"),
            Error::Driver(e) => write!(f, "Driver error: {e}"),
        }
    }
}
