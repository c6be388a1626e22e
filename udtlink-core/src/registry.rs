//! The process-scoped metadata registry.

use alloc::{string::String, sync::Arc};

use dashmap::DashMap;

use crate::{
    metadata::Builder,
    udt::{ObjectShape, Udt},
    Preset, PresetConfiguration, Result, TypeMetadata, UdtDefinition,
};

/// The store of presets, type metadata and remote definitions.
///
/// Constructed once at startup and shared (usually behind an [`Arc`]) by everything that
/// marshals parameters. Presets and metadata are keyed by the host type's fully-qualified name,
/// definitions by the remote object's full name. Entries are never evicted.
///
/// Building metadata is not atomic with looking it up: concurrent first uses of a host type may
/// each build it, and the last insert wins. Builds are pure, so the racing results are equal.
///
/// ```
/// use udtlink_core::{udt::Udt, MetadataRegistry, Preset, UdtIdentity};
///
/// #[derive(Udt)]
/// #[udt(crate = "udtlink_core")]
/// struct Phone {
///     number: String,
/// }
///
/// let registry = MetadataRegistry::new();
/// registry.register_preset(
///     Phone::OBJECT.name(),
///     Preset::new(UdtIdentity::parse("HR.PHONE|HR.PHONE_TBL").unwrap()),
/// );
/// let metadata = registry.metadata::<Phone>().unwrap();
/// assert_eq!(metadata.identity().full_object_name(), "HR.PHONE");
/// assert!(registry.is_built(Phone::OBJECT.name()));
/// ```
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    presets: DashMap<String, Arc<Preset>>,
    metadata: DashMap<String, Arc<TypeMetadata>>,
    definitions: DashMap<String, Arc<UdtDefinition>>,
}

impl MetadataRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with `configuration`.
    pub fn with_configuration(configuration: PresetConfiguration) -> Self {
        let registry = Self::new();
        registry.configure(configuration);
        registry
    }

    /// Registers the preset of the host type named `host_name`.
    ///
    /// Presets must be registered before the host type's metadata is first built. A later
    /// registration replaces the stored preset but not the already-built metadata.
    pub fn register_preset(&self, host_name: impl Into<String>, preset: Preset) {
        let host_name = host_name.into();
        if self.metadata.contains_key(&host_name) {
            warn!("Metadata of `{host_name}` is already built, the new preset has no effect on it");
        }
        self.presets.insert(host_name, Arc::new(preset));
    }

    /// Registers every preset of `configuration`.
    pub fn configure(&self, configuration: PresetConfiguration) {
        for (host_name, preset) in configuration {
            self.register_preset(host_name, preset);
        }
    }

    /// The preset of the host type named `host_name`.
    ///
    /// After the host type's metadata is built, this is the effective preset it was built from.
    pub fn preset(&self, host_name: &str) -> Option<Arc<Preset>> {
        self.presets
            .get(host_name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// The metadata of `T`, building it on first use.
    pub fn metadata<T: Udt>(&self) -> Result<Arc<TypeMetadata>> {
        self.metadata_for(T::OBJECT)
    }

    /// The metadata of the host type described by `shape`, building it on first use.
    pub fn metadata_for(&self, shape: &'static ObjectShape<'static>) -> Result<Arc<TypeMetadata>> {
        // Clone out of the map so no shard lock is held while building.
        let cached = self
            .metadata
            .get(shape.name())
            .map(|entry| Arc::clone(entry.value()));
        if let Some(metadata) = cached {
            trace!("Metadata cache hit for `{}`", shape.name());
            return Ok(metadata);
        }

        let (metadata, preset) = Builder::new(self, shape).build()?;
        let metadata = Arc::new(metadata);
        self.presets
            .entry(String::from(shape.name()))
            .or_insert_with(|| Arc::new(preset));
        self.metadata
            .insert(String::from(shape.name()), Arc::clone(&metadata));

        Ok(metadata)
    }

    /// The remote definition of the object named `full_object_name` (`SCHEMA.OBJECT`).
    pub fn definition(&self, full_object_name: &str) -> Option<Arc<UdtDefinition>> {
        self.definitions
            .get(full_object_name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Whether the metadata of the host type named `host_name` is built.
    pub fn is_built(&self, host_name: &str) -> bool {
        self.metadata.contains_key(host_name)
    }

    /// Stores `definition` unless one is already stored under its name, returning the stored one.
    pub(crate) fn insert_definition(&self, definition: UdtDefinition) -> Arc<UdtDefinition> {
        let name = definition.identity().full_object_name();
        let entry = self
            .definitions
            .entry(name)
            .or_insert_with(|| Arc::new(definition));

        Arc::clone(entry.value())
    }
}
