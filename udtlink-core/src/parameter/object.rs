use alloc::{format, string::String, sync::Arc, vec::Vec};

use super::{check_output, InputFragment, Marshaller, OutputFragment, RawOutput};
use crate::{
    metadata::{variable_name, UdtKind},
    udt::Shape,
    Direction, Error, MetadataRegistry, Result, TypeMetadata, Value,
};

/// An object or collection parameter, passed through a PL/SQL variable.
///
/// The variable is initialized with a constructor expression whose scalar leaves are bound, and
/// returned values come back through a ref cursor opened over the variable after the call.
#[derive(Debug)]
pub struct ObjectParam {
    name: String,
    direction: Direction,
    kind: UdtKind,
    metadata: Arc<TypeMetadata>,
    value: Value,
    applied: bool,
}

impl ObjectParam {
    /// A parameter of host type shape `shape` holding `value`.
    ///
    /// Resolves the metadata of the object type (or of the collection's element type).
    pub fn new(
        registry: &MetadataRegistry,
        name: &str,
        direction: Direction,
        shape: &'static Shape<'static>,
        value: Value,
    ) -> Result<Self> {
        let (kind, object) = match shape.required() {
            Shape::Object(object) => (UdtKind::Object, *object),
            Shape::Collection(object) => (UdtKind::Collection, *object),
            Shape::Scalar(scalar) => {
                return Err(Error::Configuration(format!(
                    "parameter `{name}` is a `{}`, not an object",
                    scalar.name()
                )))
            }
            Shape::Optional(_) => {
                return Err(Error::Configuration(format!(
                    "parameter `{name}` has a nested optional shape"
                )))
            }
        };
        let metadata = registry.metadata_for(object)?;
        if kind == UdtKind::Collection {
            // Fail now rather than when rendering.
            metadata.identity().full_collection_name()?;
        }

        Ok(Self {
            name: name.into(),
            direction,
            kind,
            metadata,
            value,
            applied: false,
        })
    }

    /// Whether this is an object or a collection.
    pub fn kind(&self) -> UdtKind {
        self.kind
    }

    /// The object type's metadata.
    pub fn metadata(&self) -> &Arc<TypeMetadata> {
        &self.metadata
    }
}

impl Marshaller for ObjectParam {
    fn name(&self) -> &str {
        &self.name
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn value(&self) -> &Value {
        &self.value
    }

    fn prepare_input(&self, start_number: u32) -> Result<InputFragment> {
        let (constructor, binds, last_number) =
            if self.direction.has_input() && !self.value.is_null() {
                let (fragment, binds) = self.metadata.render(&self.value, start_number)?;
                (Some(fragment.text), binds, fragment.last_number)
            } else {
                (None, Vec::new(), start_number)
            };
        let declare = self
            .metadata
            .declare_line(self.kind, &self.name, constructor.as_deref())?;

        Ok(InputFragment {
            declare: Some(declare),
            argument: variable_name(&self.name),
            binds,
            last_number,
        })
    }

    fn prepare_output(&self, start_number: u32) -> Result<Option<OutputFragment>> {
        if !self.direction.has_output() {
            return Ok(None);
        }

        let fragment = match self.kind {
            UdtKind::Object => self.metadata.get_ref_cursor_query(start_number, &self.name),
            UdtKind::Collection => self
                .metadata
                .get_ref_cursor_collection_query(start_number, &self.name),
        };

        Ok(Some(OutputFragment {
            clause: fragment.text,
            bind: self.metadata.get_oracle_parameter_for_ref_cursor(start_number),
            last_number: fragment.last_number,
        }))
    }

    fn apply_output(&mut self, raw: RawOutput<'_>) -> Result<()> {
        check_output(&self.name, self.direction, self.applied)?;
        let RawOutput::Cursor(cursor) = raw else {
            return Err(Error::UnexpectedOutput(format!(
                "`{}` expects a ref cursor",
                self.name
            )));
        };
        self.value = self.metadata.get_value_from_ref_cursor(cursor, self.kind)?;
        self.applied = true;

        Ok(())
    }
}
