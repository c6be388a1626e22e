//! Procedure call parameters and how they marshal into statements.
//!
//! Every parameter implements [`Marshaller`]: it renders its input half (an optional variable
//! declaration, the call argument and its binds) and its output half (a post-call clause and its
//! bind), then accepts exactly one value back once the statement has run.

use alloc::{string::String, vec::Vec};

use crate::{
    udt::{Shape, Type},
    BindParameter, Cursor, Direction, Error, MetadataRegistry, Result, Value,
};

mod managed;
pub use managed::ScalarManagedParam;
mod native;
pub use native::ScalarNativeParam;
mod object;
pub use object::ObjectParam;

/// The input half of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFragment {
    /// The variable declaration, for parameters passed through a variable.
    pub declare: Option<String>,
    /// The argument in the procedure call: a placeholder or a variable name.
    pub argument: String,
    /// The binds of the placeholders in `declare` and `argument`, in order.
    pub binds: Vec<BindParameter>,
    /// The first placeholder number this fragment did not use.
    pub last_number: u32,
}

/// The output half of a parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFragment {
    /// The statement run after the call, moving the value into `bind`.
    pub clause: String,
    /// The output bind.
    pub bind: BindParameter,
    /// The first placeholder number this fragment did not use.
    pub last_number: u32,
}

/// A raw post-execution value.
pub enum RawOutput<'c> {
    /// The value of a scalar output bind.
    Scalar(Value),
    /// The ref cursor of an object or collection output.
    Cursor(&'c mut dyn Cursor),
}

impl core::fmt::Debug for RawOutput<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RawOutput::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            RawOutput::Cursor(_) => f.write_str("Cursor(..)"),
        }
    }
}

/// A parameter that marshals itself into a statement.
pub trait Marshaller {
    /// The procedure's formal parameter name.
    fn name(&self) -> &str;

    /// The direction.
    fn direction(&self) -> Direction;

    /// The held value: the caller's before execution, the returned one after.
    fn value(&self) -> &Value;

    /// Renders the input half, numbering placeholders from `start_number`.
    fn prepare_input(&self, start_number: u32) -> Result<InputFragment>;

    /// Renders the output half, numbering placeholders from `start_number`.
    ///
    /// `None` when the parameter has no output half.
    fn prepare_output(&self, start_number: u32) -> Result<Option<OutputFragment>>;

    /// Accepts the post-execution value. Only one is accepted, and only by output parameters.
    fn apply_output(&mut self, raw: RawOutput<'_>) -> Result<()>;
}

/// A procedure call parameter.
#[derive(Debug)]
pub enum Parameter {
    /// A scalar the driver binds natively.
    ScalarNative(ScalarNativeParam),
    /// A scalar passed through a PL/SQL variable.
    ScalarManaged(ScalarManagedParam),
    /// An object or a collection of objects.
    Object(ObjectParam),
}

impl Parameter {
    /// A natively bound scalar.
    ///
    /// Fails with [`Error::Configuration`] if `T` is not a scalar type.
    pub fn native<T: Type>(name: &str, direction: Direction, value: &T) -> Result<Self> {
        match T::SHAPE.required() {
            Shape::Scalar(scalar) => Ok(Parameter::ScalarNative(ScalarNativeParam::new(
                name,
                direction,
                *scalar,
                value.to_value(),
            ))),
            _ => Err(Error::Configuration(alloc::format!(
                "parameter `{name}` is not a scalar"
            ))),
        }
    }

    /// An output-only natively bound scalar of host type `T`.
    pub fn native_output<T: Type>(name: &str) -> Result<Self> {
        Self::native::<Option<T>>(name, Direction::Output, &None)
    }

    /// A PL/SQL `BOOLEAN`.
    pub fn managed_boolean(name: &str, direction: Direction, value: Option<bool>) -> Self {
        Parameter::ScalarManaged(ScalarManagedParam::boolean(name, direction, value))
    }

    /// An object, for `T: Udt`, or a collection of objects, for `Vec<T>`.
    ///
    /// The element type's metadata is resolved here, so unmapped types fail now.
    pub fn object<T: Type>(
        registry: &MetadataRegistry,
        name: &str,
        direction: Direction,
        value: &T,
    ) -> Result<Self> {
        ObjectParam::new(registry, name, direction, T::SHAPE, value.to_value())
            .map(Parameter::Object)
    }

    /// An output-only object or collection of host type `T`.
    pub fn object_output<T: Type>(registry: &MetadataRegistry, name: &str) -> Result<Self> {
        ObjectParam::new(registry, name, Direction::Output, T::SHAPE, Value::Null)
            .map(Parameter::Object)
    }

    /// The held value, converted to host type `T`.
    pub fn value_as<T: Type>(&self) -> Result<T> {
        T::from_value(self.value().clone())
    }

    fn marshaller(&self) -> &dyn Marshaller {
        match self {
            Parameter::ScalarNative(param) => param,
            Parameter::ScalarManaged(param) => param,
            Parameter::Object(param) => param,
        }
    }

    fn marshaller_mut(&mut self) -> &mut dyn Marshaller {
        match self {
            Parameter::ScalarNative(param) => param,
            Parameter::ScalarManaged(param) => param,
            Parameter::Object(param) => param,
        }
    }
}

impl Marshaller for Parameter {
    fn name(&self) -> &str {
        self.marshaller().name()
    }

    fn direction(&self) -> Direction {
        self.marshaller().direction()
    }

    fn value(&self) -> &Value {
        self.marshaller().value()
    }

    fn prepare_input(&self, start_number: u32) -> Result<InputFragment> {
        self.marshaller().prepare_input(start_number)
    }

    fn prepare_output(&self, start_number: u32) -> Result<Option<OutputFragment>> {
        self.marshaller().prepare_output(start_number)
    }

    fn apply_output(&mut self, raw: RawOutput<'_>) -> Result<()> {
        self.marshaller_mut().apply_output(raw)
    }
}

/// Checks parameter `name` may take its post-execution value.
fn check_output(name: &str, direction: Direction, applied: bool) -> Result<()> {
    if !direction.has_output() {
        return Err(Error::UnexpectedOutput(alloc::format!(
            "`{name}` is an input parameter"
        )));
    }
    if applied {
        return Err(Error::OutputAlreadyApplied(name.into()));
    }

    Ok(())
}
