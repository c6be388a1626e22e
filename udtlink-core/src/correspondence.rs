//! Host property to remote attribute correspondence.

use alloc::{string::String, vec::Vec};

use indexmap::IndexMap;

use crate::{Error, Result};

/// The ordered `(host property, remote attribute)` pairs of one host type.
///
/// Built once per host type, when its metadata is first built, and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCorrespondence {
    pairs: Vec<(String, String)>,
    fuzzy: bool,
}

impl PropertyCorrespondence {
    /// Resolves every host property against the remote attribute list.
    ///
    /// For each property, in order: an explicit override, the exact upper-cased name and, in
    /// fuzzy mode, a case-insensitive match ignoring underscores among the attributes no earlier
    /// property took. A property matching none of them, or whose override or exact match is
    /// already taken, fails with [`Error::PropertyCorrespondence`].
    pub(crate) fn resolve<'p>(
        host_type: &str,
        properties: impl IntoIterator<Item = &'p str>,
        attributes: &[String],
        overrides: &IndexMap<String, String>,
        fuzzy: bool,
    ) -> Result<Self> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for property in properties {
            let taken = |attribute: &String| pairs.iter().any(|(_, taken)| taken == attribute);
            let attribute = match overrides.get(property) {
                Some(attribute) => attributes
                    .iter()
                    .find(|candidate| candidate.eq_ignore_ascii_case(attribute)),
                None => {
                    let upper = default_attribute(property);
                    attributes
                        .iter()
                        .find(|candidate| **candidate == upper)
                        .or_else(|| {
                            let key = fuzzy_key(property);
                            attributes.iter().find(|candidate| {
                                fuzzy && !taken(*candidate) && fuzzy_key(candidate) == key
                            })
                        })
                }
            };
            let attribute = attribute
                .filter(|attribute| !taken(*attribute))
                .ok_or_else(|| Error::PropertyCorrespondence {
                    host_type: host_type.into(),
                    property: property.into(),
                })?
                .clone();
            trace!("`{host_type}.{property}` corresponds to `{attribute}`");
            pairs.push((String::from(property), attribute));
        }

        Ok(Self { pairs, fuzzy })
    }

    /// The remote attribute a host property corresponds to.
    pub fn attribute_for(&self, property: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(candidate, _)| candidate == property)
            .map(|(_, attribute)| attribute.as_str())
    }

    /// The host property a remote attribute (or cursor column) corresponds to.
    ///
    /// Names are compared case-insensitively and, in fuzzy mode, ignoring underscores.
    pub fn property_for(&self, attribute: &str) -> Option<&str> {
        let exact = self
            .pairs
            .iter()
            .find(|(_, candidate)| candidate.eq_ignore_ascii_case(attribute));
        let found = match exact {
            Some(pair) => Some(pair),
            None if self.fuzzy => {
                let key = fuzzy_key(attribute);
                self.pairs
                    .iter()
                    .find(|(_, candidate)| fuzzy_key(candidate) == key)
            }
            None => None,
        };

        found.map(|(property, _)| property.as_str())
    }

    /// The pairs, in host property order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(property, attribute)| (property.as_str(), attribute.as_str()))
    }

    /// Whether fuzzy matching is enabled.
    pub fn is_fuzzy(&self) -> bool {
        self.fuzzy
    }

    /// The number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// The remote attribute a host property maps to by default: its upper-cased name.
pub(crate) fn default_attribute(property: &str) -> String {
    property.to_uppercase()
}

fn fuzzy_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_uppercase)
        .collect()
}
