//! Per host type metadata: the fragment-producing half of the mapping engine.
//!
//! A [`TypeMetadata`] is built once per host type by the [`MetadataRegistry`] and then shared.
//! It renders host values into PL/SQL constructor expressions with positional placeholders,
//! flattens the same values into bind parameters and rebuilds host values from cursor rows.
//!
//! [`MetadataRegistry`]: crate::MetadataRegistry

use alloc::{
    format,
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};
use core::fmt::Write;

use heck::ToSnakeCase;

use crate::{
    convert::coerce,
    kind::native_binding,
    udt::{HostScalar, Type},
    BindParameter, Cursor, Direction, Error, OracleDbType, PropertyCorrespondence, Record, Result,
    UdtDefinition, UdtIdentity, Value,
};

mod builder;
pub(crate) use builder::Builder;

/// Whether a variable holds one object or a collection of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UdtKind {
    /// A single object.
    Object,
    /// A collection of objects.
    Collection,
}

/// A rendered statement fragment and the next free placeholder number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The fragment's text.
    pub text: String,
    /// The first placeholder number the fragment did not use.
    pub last_number: u32,
}

/// The mapping of one host type to its remote object type.
#[derive(Debug, PartialEq)]
pub struct TypeMetadata {
    host: &'static str,
    identity: UdtIdentity,
    correspondence: PropertyCorrespondence,
    definition: Arc<UdtDefinition>,
    slots: Vec<Slot>,
}

/// One remote attribute, in remote order, and the host property feeding it.
#[derive(Debug, PartialEq)]
pub(crate) struct Slot {
    pub(crate) attribute: String,
    pub(crate) binding: Option<Binding>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct Binding {
    pub(crate) property: &'static str,
    pub(crate) target: Target,
}

#[derive(Debug, PartialEq)]
pub(crate) enum Target {
    Scalar(HostScalar),
    Object(Arc<TypeMetadata>),
    Collection(Arc<TypeMetadata>),
}

impl TypeMetadata {
    pub(crate) fn new(
        host: &'static str,
        identity: UdtIdentity,
        correspondence: PropertyCorrespondence,
        definition: Arc<UdtDefinition>,
        slots: Vec<Slot>,
    ) -> Self {
        Self {
            host,
            identity,
            correspondence,
            definition,
            slots,
        }
    }

    /// The host type's fully-qualified name.
    pub fn host_name(&self) -> &'static str {
        self.host
    }

    /// The remote identity.
    pub fn identity(&self) -> &UdtIdentity {
        &self.identity
    }

    /// The property correspondence.
    pub fn correspondence(&self) -> &PropertyCorrespondence {
        &self.correspondence
    }

    /// Whether fuzzy matching is enabled.
    pub fn is_fuzzy(&self) -> bool {
        self.correspondence.is_fuzzy()
    }

    /// The remote object's shape.
    pub fn definition(&self) -> &Arc<UdtDefinition> {
        &self.definition
    }

    /// The remote attributes, in order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.attribute.as_str())
    }

    /// The declaration of the variable holding parameter `parameter_name`.
    ///
    /// `v_<name> SCHEMA.TYPE := <constructor>;`, initialized to `NULL` without a constructor.
    /// A [`UdtKind::Collection`] variable is typed with the collection type, which must be named.
    pub fn declare_line(
        &self,
        kind: UdtKind,
        parameter_name: &str,
        constructor: Option<&str>,
    ) -> Result<String> {
        let type_name = match kind {
            UdtKind::Object => self.identity.full_object_name(),
            UdtKind::Collection => self.identity.full_collection_name()?,
        };

        Ok(declare_line(
            &variable_name(parameter_name),
            &type_name,
            constructor.unwrap_or("NULL"),
        ))
    }

    /// Renders `value` as a constructor expression, numbering placeholders from `start_number`.
    ///
    /// An object renders as `SCHEMA.OBJECT(:1, :2, ...)`, a collection as
    /// `SCHEMA.COLLECTION(SCHEMA.OBJECT(...), ...)`. Nested objects and collections render
    /// recursively, depth-first. Each scalar leaf consumes one placeholder, `NULL` ones included;
    /// `NULL` objects and collections, as well as attributes no property maps to, render as `NULL`.
    pub fn build_query_constructor_string(
        &self,
        value: &Value,
        start_number: u32,
    ) -> Result<Fragment> {
        self.render(value, start_number).map(|(fragment, _)| fragment)
    }

    /// The bind parameters of the placeholders [`Self::build_query_constructor_string`] renders.
    ///
    /// Placeholder `:n` corresponds to the parameter at position `n - start_number`.
    pub fn get_oracle_parameters(
        &self,
        value: &Value,
        start_number: u32,
    ) -> Result<Vec<BindParameter>> {
        self.render(value, start_number).map(|(_, binds)| binds)
    }

    /// Renders the constructor and its binds in one walk.
    pub(crate) fn render(
        &self,
        value: &Value,
        start_number: u32,
    ) -> Result<(Fragment, Vec<BindParameter>)> {
        let mut walker = Walker::new(start_number);
        match value {
            Value::Collection(_) => walker.collection(self, value)?,
            _ => walker.object(self, value)?,
        }

        Ok(walker.finish())
    }

    /// The statement opening a ref cursor over the object variable of `parameter_name`.
    ///
    /// Consumes one placeholder, the cursor's.
    pub fn get_ref_cursor_query(&self, start_number: u32, parameter_name: &str) -> Fragment {
        let variable = variable_name(parameter_name);
        let mut text = format!("OPEN :{start_number} FOR SELECT ");
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            let _ = write!(text, "{variable}.{0} AS {0}", slot.attribute);
        }
        let _ = write!(text, " FROM DUAL WHERE {variable} IS NOT NULL;");

        Fragment {
            text,
            last_number: start_number + 1,
        }
    }

    /// The statement opening a ref cursor over the collection variable of `parameter_name`.
    ///
    /// Consumes one placeholder, the cursor's.
    pub fn get_ref_cursor_collection_query(
        &self,
        start_number: u32,
        parameter_name: &str,
    ) -> Fragment {
        Fragment {
            text: format!(
                "OPEN :{start_number} FOR SELECT * FROM TABLE({});",
                variable_name(parameter_name)
            ),
            last_number: start_number + 1,
        }
    }

    /// The output bind parameter receiving a ref cursor.
    pub fn get_oracle_parameter_for_ref_cursor(&self, start_number: u32) -> BindParameter {
        BindParameter::new(
            start_number,
            Direction::Output,
            Some(OracleDbType::RefCursor),
            None,
            Value::Null,
        )
    }

    /// Reads the host value(s) out of a ref cursor opened by one of the queries above.
    ///
    /// Columns map back to host properties by name, exactly or, in fuzzy mode, loosely. Unknown
    /// columns are skipped. Returns a [`Value::Object`] keyed by property name, or [`Value::Null`]
    /// when an object cursor has no rows; a [`Value::Collection`] in row order for collections.
    pub fn get_value_from_ref_cursor(
        &self,
        cursor: &mut dyn Cursor,
        kind: UdtKind,
    ) -> Result<Value> {
        let mut rows = Vec::new();
        while cursor.advance()? {
            let count = cursor.field_count();
            let mut row = Record::with_capacity(count);
            for ordinal in 0..count {
                let column = cursor.field_name(ordinal)?.to_string();
                let value = cursor.value(ordinal)?;
                row.insert(column, value);
            }
            rows.push(Value::Object(self.host_record(row)?));
        }
        trace!("Read {} row(s) of `{}`", rows.len(), self.identity);

        match kind {
            UdtKind::Object => {
                if rows.len() > 1 {
                    debug!(
                        "Object cursor of `{}` returned {} rows, using the first",
                        self.identity,
                        rows.len()
                    );
                }
                Ok(rows.into_iter().next().unwrap_or(Value::Null))
            }
            UdtKind::Collection => Ok(Value::Collection(rows)),
        }
    }

    /// Converts a raw scalar output into host type `U`.
    pub fn convert_oracle_parameter_to_base_type<U: Type>(&self, raw: Value) -> Result<U> {
        U::from_value(raw)
    }

    /// Translates a record keyed by remote attribute name into one keyed by property name.
    fn host_record(&self, remote: Record) -> Result<Record> {
        let mut host = Record::with_capacity(self.slots.len());
        for (column, value) in remote {
            let Some(binding) = self.binding_for_column(&column) else {
                trace!("Skipping column `{column}` of `{}`", self.identity);
                continue;
            };
            let value = match &binding.target {
                Target::Scalar(scalar) => coerce(*scalar, value)?,
                Target::Object(nested) => nested.host_object(value)?,
                Target::Collection(nested) => nested.host_collection(value)?,
            };
            host.insert(binding.property, value);
        }

        Ok(host)
    }

    fn host_object(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Object(record) => self.host_record(record).map(Value::Object),
            other => Err(Error::conversion(self.host, other)),
        }
    }

    fn host_collection(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Collection(items) => items
                .into_iter()
                .map(|item| self.host_object(item))
                .collect::<Result<_>>()
                .map(Value::Collection),
            other => Err(Error::conversion("collection", other)),
        }
    }

    fn binding_for_column(&self, column: &str) -> Option<&Binding> {
        let property = self.correspondence.property_for(column)?;
        self.slots
            .iter()
            .filter_map(|slot| slot.binding.as_ref())
            .find(|binding| binding.property == property)
    }
}

/// The name of the host-side variable holding parameter `parameter_name`.
pub(crate) fn variable_name(parameter_name: &str) -> String {
    format!("v_{}", parameter_name.to_snake_case())
}

/// `variable type := initializer;`
pub(crate) fn declare_line(variable: &str, type_name: &str, initializer: &str) -> String {
    format!("{variable} {type_name} := {initializer};")
}

/// The single walk producing both constructor text and bind parameters.
#[derive(Debug)]
struct Walker {
    text: String,
    binds: Vec<BindParameter>,
    next: u32,
}

impl Walker {
    fn new(start_number: u32) -> Self {
        Self {
            text: String::new(),
            binds: Vec::new(),
            next: start_number,
        }
    }

    fn finish(self) -> (Fragment, Vec<BindParameter>) {
        (
            Fragment {
                text: self.text,
                last_number: self.next,
            },
            self.binds,
        )
    }

    fn object(&mut self, metadata: &TypeMetadata, value: &Value) -> Result<()> {
        let record = match value {
            Value::Null => {
                self.text.push_str("NULL");
                return Ok(());
            }
            Value::Object(record) => record,
            other => return Err(Error::conversion(metadata.host, other)),
        };

        self.text.push_str(&metadata.identity.full_object_name());
        self.text.push('(');
        for (i, slot) in metadata.slots.iter().enumerate() {
            if i > 0 {
                self.text.push_str(", ");
            }
            let Some(binding) = &slot.binding else {
                self.text.push_str("NULL");
                continue;
            };
            let field = record.get(binding.property).unwrap_or(&Value::Null);
            match &binding.target {
                Target::Scalar(scalar) => self.scalar(*scalar, field)?,
                Target::Object(nested) => self.object(nested, field)?,
                Target::Collection(nested) => self.collection(nested, field)?,
            }
        }
        self.text.push(')');

        Ok(())
    }

    fn collection(&mut self, metadata: &TypeMetadata, value: &Value) -> Result<()> {
        let items = match value {
            Value::Null => {
                self.text.push_str("NULL");
                return Ok(());
            }
            Value::Collection(items) => items,
            other => return Err(Error::conversion("collection", other)),
        };

        self.text.push_str(&metadata.identity.full_collection_name()?);
        self.text.push('(');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.text.push_str(", ");
            }
            self.object(metadata, item)?;
        }
        self.text.push(')');

        Ok(())
    }

    fn scalar(&mut self, scalar: HostScalar, value: &Value) -> Result<()> {
        let number = self.next;
        self.next += 1;
        let _ = write!(self.text, ":{number}");

        let value = coerce(scalar, value.clone())?;
        let (kind, size) = native_binding(scalar, Direction::Input, &value);
        self.binds
            .push(BindParameter::new(number, Direction::Input, kind, size, value));

        Ok(())
    }
}

#[cfg(test)]
mod tests;
