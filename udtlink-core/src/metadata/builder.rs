use alloc::{format, string::String, sync::Arc, vec::Vec};

use super::{Binding, Slot, Target, TypeMetadata};
use crate::{
    correspondence::default_attribute,
    definition::{AttributeDefinition, AttributeKind},
    udt::{ObjectShape, Property, Shape},
    Error, MetadataRegistry, OracleDbType, Preset, PropertyCorrespondence, Result, UdtDefinition,
};

/// Builds the [`TypeMetadata`] of one host type.
///
/// Nested object and collection properties resolve their own metadata through the registry
/// while building, so their errors surface here.
#[derive(Debug)]
pub(crate) struct Builder<'r> {
    registry: &'r MetadataRegistry,
    shape: &'static ObjectShape<'static>,
}

impl<'r> Builder<'r> {
    pub(crate) fn new(
        registry: &'r MetadataRegistry,
        shape: &'static ObjectShape<'static>,
    ) -> Self {
        Self { registry, shape }
    }

    /// Builds the metadata and the effective preset it was built from.
    pub(crate) fn build(self) -> Result<(TypeMetadata, Preset)> {
        let host = self.shape.name();
        let registered = self.registry.preset(host);
        let preset = Preset::effective(self.shape, registered.as_deref())?;
        let identity = preset
            .identity()
            .cloned()
            .ok_or_else(|| Error::UnmappedType(host.into()))?;

        let attributes: Vec<String> = match preset.declared_attributes() {
            Some(attributes) => attributes.to_vec(),
            None => self
                .shape
                .properties()
                .map(|property| match preset.override_for(property.name()) {
                    Some(attribute) => String::from(attribute),
                    None => default_attribute(property.name()),
                })
                .collect(),
        };
        if attributes.is_empty() {
            return Err(Error::Configuration(format!(
                "`{host}` maps to `{identity}` but declares no attributes"
            )));
        }
        let correspondence = PropertyCorrespondence::resolve(
            host,
            self.shape.properties().map(Property::name),
            &attributes,
            preset.overrides(),
            preset.is_fuzzy(),
        )?;

        let mut slots = Vec::with_capacity(attributes.len());
        let mut definitions = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let property = correspondence
                .iter()
                .find(|(_, candidate)| *candidate == attribute)
                .and_then(|(property, _)| self.shape.property(property));
            let binding = match property {
                Some(property) => Some(Binding {
                    property: property.name(),
                    target: self.target(property, property.shape())?,
                }),
                None => {
                    debug!("No property of `{host}` maps to `{identity}.{attribute}`");
                    None
                }
            };
            let kind = match binding.as_ref().map(|binding| &binding.target) {
                Some(Target::Scalar(scalar)) => {
                    AttributeKind::Scalar(OracleDbType::for_scalar(*scalar))
                }
                Some(Target::Object(nested)) => {
                    AttributeKind::Object(nested.identity().full_object_name())
                }
                Some(Target::Collection(nested)) => {
                    AttributeKind::Collection(nested.identity().full_collection_name()?)
                }
                None => AttributeKind::Unknown,
            };
            definitions.push(AttributeDefinition::new(attribute.clone(), kind));
            slots.push(Slot { attribute, binding });
        }

        // Host types sharing a remote object share its definition only when they agree on it.
        let own = UdtDefinition::new(identity.clone(), definitions);
        let stored = self.registry.insert_definition(own.clone());
        let definition = if *stored == own {
            stored
        } else {
            debug!("`{host}` disagrees with the stored definition of `{identity}`, keeping its own");
            Arc::new(own)
        };
        debug!("Built metadata of `{host}` as `{identity}`:\n{definition}");

        Ok((
            TypeMetadata::new(host, identity, correspondence, definition, slots),
            preset,
        ))
    }

    fn target(
        &self,
        property: &Property<'static>,
        shape: &'static Shape<'static>,
    ) -> Result<Target> {
        match shape {
            Shape::Optional(inner) => self.target(property, *inner),
            Shape::Scalar(scalar) => {
                if OracleDbType::for_scalar(*scalar).is_none() {
                    debug!(
                        "`{}.{}` is a `{}`, which has no remote kind",
                        self.shape.name(),
                        property.name(),
                        scalar.name()
                    );
                }
                Ok(Target::Scalar(*scalar))
            }
            Shape::Object(nested) => self.registry.metadata_for(*nested).map(Target::Object),
            Shape::Collection(nested) => {
                let metadata = self.registry.metadata_for(*nested)?;
                if !metadata.identity().is_collection_valid() {
                    return Err(Error::Configuration(format!(
                        "`{}.{}` is a collection but `{}` names no collection type",
                        self.shape.name(),
                        property.name(),
                        metadata.identity()
                    )));
                }
                Ok(Target::Collection(metadata))
            }
        }
    }
}

