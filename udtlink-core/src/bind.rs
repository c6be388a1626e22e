//! Native bind parameters and the sink that receives them.

use alloc::{format, string::String, vec::Vec};

use crate::{OracleDbType, Result, Value};

/// The direction of a call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Passed to the procedure only.
    Input,
    /// Returned by the procedure only.
    Output,
    /// Passed to and returned by the procedure.
    InputOutput,
}

impl Direction {
    /// Whether the caller's value is sent to the procedure.
    pub const fn has_input(&self) -> bool {
        matches!(self, Direction::Input | Direction::InputOutput)
    }

    /// Whether the procedure sends a value back.
    pub const fn has_output(&self) -> bool {
        matches!(self, Direction::Output | Direction::InputOutput)
    }
}

/// One positional bind parameter, matching placeholder `:number` in the statement text.
#[derive(Debug, Clone, PartialEq)]
pub struct BindParameter {
    number: u32,
    direction: Direction,
    kind: Option<OracleDbType>,
    size: Option<usize>,
    value: Value,
}

impl BindParameter {
    /// Creates a bind parameter.
    pub fn new(
        number: u32,
        direction: Direction,
        kind: Option<OracleDbType>,
        size: Option<usize>,
        value: Value,
    ) -> Self {
        Self {
            number,
            direction,
            kind,
            size,
            value,
        }
    }

    /// The placeholder number.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// The placeholder name, as the binder expects it.
    pub fn name(&self) -> String {
        format!("{}", self.number)
    }

    /// The direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The remote kind, if one is assigned.
    pub fn kind(&self) -> Option<OracleDbType> {
        self.kind
    }

    /// The size, for bounded kinds.
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    /// The value to send; [`Value::Null`] for output-only parameters.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A native bind-parameter sink, implemented by the driver integration.
pub trait BindSink {
    /// Adds one parameter. Parameters arrive in placeholder order.
    fn bind(
        &mut self,
        name: &str,
        direction: Direction,
        kind: Option<OracleDbType>,
        size: Option<usize>,
        value: &Value,
    ) -> Result<()>;
}

impl BindSink for Vec<BindParameter> {
    fn bind(
        &mut self,
        name: &str,
        direction: Direction,
        kind: Option<OracleDbType>,
        size: Option<usize>,
        value: &Value,
    ) -> Result<()> {
        let number = name.parse().map_err(|_| {
            crate::Error::Configuration(format!("`{name}` is not a positional bind name"))
        })?;
        self.push(BindParameter::new(number, direction, kind, size, value.clone()));
        Ok(())
    }
}
