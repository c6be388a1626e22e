//! Caller-supplied presets: identity, attribute list and mapping overrides per host type.

use alloc::{string::String, vec::Vec};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    udt::{ObjectShape, Udt},
    Error, Result, UdtIdentity,
};

/// The mapping preset of one host type.
///
/// A preset supplies whatever the host type's capability marker doesn't: the remote identity,
/// the remote attribute list, property to attribute overrides and the strict flag.
///
/// ```
/// use udtlink_core::{Preset, UdtIdentity};
///
/// let preset = Preset::new(UdtIdentity::parse("HR.EMP|HR.EMP_TBL").unwrap())
///     .map("name", "full_name")
///     .strict();
/// assert_eq!(preset.override_for("name"), Some("FULL_NAME"));
/// assert!(!preset.is_fuzzy());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identity: Option<UdtIdentity>,
    #[serde(default = "fuzzy_by_default")]
    fuzzy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    overrides: IndexMap<String, String>,
}

impl Preset {
    /// A preset naming the remote identity.
    pub fn new(identity: UdtIdentity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::default()
        }
    }

    /// Maps `property` to `attribute`, bypassing the default rule.
    pub fn map(mut self, property: impl Into<String>, attribute: &str) -> Self {
        self.overrides
            .insert(property.into(), attribute.trim().to_uppercase());
        self
    }

    /// Declares the remote object's attributes, in order.
    pub fn attributes<I, A>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        self.attributes = Some(
            attributes
                .into_iter()
                .map(|attribute| attribute.as_ref().trim().to_uppercase())
                .collect(),
        );
        self
    }

    /// Disables fuzzy matching.
    pub fn strict(mut self) -> Self {
        self.fuzzy = false;
        self
    }

    /// The remote identity, if the preset names one.
    pub fn identity(&self) -> Option<&UdtIdentity> {
        self.identity.as_ref()
    }

    /// Whether fuzzy matching is enabled.
    pub fn is_fuzzy(&self) -> bool {
        self.fuzzy
    }

    /// The declared remote attributes, if any.
    pub fn declared_attributes(&self) -> Option<&[String]> {
        self.attributes.as_deref()
    }

    /// The attribute `property` is explicitly mapped to.
    pub fn override_for(&self, property: &str) -> Option<&str> {
        self.overrides.get(property).map(String::as_str)
    }

    /// All explicit overrides, in insertion order.
    pub fn overrides(&self) -> &IndexMap<String, String> {
        &self.overrides
    }
}

impl Default for Preset {
    /// A preset without identity, attributes or overrides, in fuzzy mode.
    fn default() -> Self {
        Self {
            identity: None,
            fuzzy: true,
            attributes: None,
            overrides: IndexMap::new(),
        }
    }
}

fn fuzzy_by_default() -> bool {
    true
}

/// Presets keyed by fully-qualified host type name.
///
/// The JSON form is an object whose keys are host type names:
///
/// ```
/// use udtlink_core::PresetConfiguration;
///
/// let configuration = PresetConfiguration::from_json(
///     r#"{
///         "hr::Employee": {
///             "identity": "HR.EMP|HR.EMP_TBL",
///             "fuzzy": false,
///             "overrides": { "name": "FULL_NAME" }
///         }
///     }"#,
/// )
/// .unwrap();
/// let preset = configuration.get("hr::Employee").unwrap();
/// assert_eq!(preset.identity().unwrap().full_object_name(), "HR.EMP");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetConfiguration {
    presets: IndexMap<String, Preset>,
}

impl PresetConfiguration {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut configuration: Self = serde_json::from_str(json)?;
        for preset in configuration.presets.values_mut() {
            preset.normalize();
        }

        Ok(configuration)
    }

    /// Adds the preset of the host type named `host_name`.
    pub fn with(mut self, host_name: impl Into<String>, preset: Preset) -> Self {
        self.presets.insert(host_name.into(), preset);
        self
    }

    /// Adds the preset of `T`.
    pub fn with_type<T: Udt>(self, preset: Preset) -> Self {
        self.with(T::OBJECT.name(), preset)
    }

    /// The preset of the host type named `host_name`.
    pub fn get(&self, host_name: &str) -> Option<&Preset> {
        self.presets.get(host_name)
    }

    /// The number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Whether there are no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// The presets, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Preset)> {
        self.presets
            .iter()
            .map(|(host_name, preset)| (host_name.as_str(), preset))
    }
}

impl IntoIterator for PresetConfiguration {
    type Item = (String, Preset);
    type IntoIter = indexmap::map::IntoIter<String, Preset>;

    fn into_iter(self) -> Self::IntoIter {
        self.presets.into_iter()
    }
}

impl Preset {
    /// Merges a host type's capability marker with its registered preset.
    ///
    /// The marker's identity wins over the preset's. Fuzzy matching stays on unless either side
    /// is strict. Declared attributes come from the preset, else from the marker.
    pub(crate) fn effective(shape: &ObjectShape<'_>, registered: Option<&Preset>) -> Result<Self> {
        let marker = shape.marker();
        let marker_identity = marker
            .map(|marker| UdtIdentity::parse(marker.identity()))
            .transpose()?;
        let preset_identity = registered.and_then(Preset::identity);
        let identity = match (marker_identity, preset_identity) {
            (Some(declared), Some(preset)) => {
                if declared != *preset {
                    warn!(
                        "`{}` is declared as `{declared}`, ignoring the preset's `{preset}`",
                        shape.name()
                    );
                }
                declared
            }
            (Some(declared), None) => declared,
            (None, Some(preset)) => preset.clone(),
            (None, None) => return Err(Error::UnmappedType(shape.name().into())),
        };

        let strict = marker.is_some_and(|marker| marker.is_strict());
        let attributes = registered
            .and_then(Preset::declared_attributes)
            .map(<[String]>::to_vec)
            .or_else(|| {
                marker
                    .map(|marker| marker.attributes())
                    .filter(|attributes| !attributes.is_empty())
                    .map(|attributes| attributes.iter().map(|a| a.to_uppercase()).collect())
            });

        Ok(Self {
            identity: Some(identity),
            fuzzy: registered.map_or(true, Preset::is_fuzzy) && !strict,
            attributes,
            overrides: registered
                .map(|preset| preset.overrides.clone())
                .unwrap_or_default(),
        })
    }

    // Deserialized names keep the caller's case.
    fn normalize(&mut self) {
        if let Some(attributes) = &mut self.attributes {
            for attribute in attributes.iter_mut() {
                *attribute = attribute.trim().to_uppercase();
            }
        }
        for attribute in self.overrides.values_mut() {
            *attribute = attribute.trim().to_uppercase();
        }
    }
}
