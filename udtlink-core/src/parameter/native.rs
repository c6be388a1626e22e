use alloc::{format, string::String, vec, vec::Vec};

use super::{check_output, InputFragment, Marshaller, OutputFragment, RawOutput};
use crate::{
    convert::coerce,
    kind::native_binding,
    metadata::{declare_line, variable_name},
    udt::HostScalar,
    BindParameter, Direction, Error, OracleDbType, Result, Value, MAX_VARCHAR2_LENGTH,
};

/// A scalar parameter the driver binds directly.
///
/// Input-only parameters are the call argument themselves. Parameters with an output half pass
/// through a PL/SQL variable instead, initialized from the input bind and copied into an output
/// bind after the call.
#[derive(Debug)]
pub struct ScalarNativeParam {
    name: String,
    direction: Direction,
    scalar: HostScalar,
    value: Value,
    applied: bool,
}

impl ScalarNativeParam {
    /// A parameter holding `value`, of host scalar type `scalar`.
    pub fn new(name: &str, direction: Direction, scalar: HostScalar, value: Value) -> Self {
        Self {
            name: name.into(),
            direction,
            scalar,
            value,
            applied: false,
        }
    }

    /// The host scalar type.
    pub fn scalar(&self) -> HostScalar {
        self.scalar
    }

    /// The kind and size of the input bind, and its value.
    fn input_binding(&self) -> (Option<OracleDbType>, Option<usize>, Value) {
        let value = if self.direction.has_input() {
            self.value.clone()
        } else {
            Value::Null
        };
        let (kind, size) = native_binding(self.scalar, Direction::Input, &value);

        (kind, size, value)
    }

    /// The kind of the variable, which also types the output bind.
    fn variable_kind(&self) -> Option<OracleDbType> {
        match self.input_binding().0 {
            Some(OracleDbType::Clob) => Some(OracleDbType::Clob),
            _ => OracleDbType::for_scalar(self.scalar),
        }
    }
}

impl Marshaller for ScalarNativeParam {
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
        let (kind, size, value) = self.input_binding();
        if kind.is_none() {
            debug!(
                "`{}` is a `{}`, binding it without a remote kind",
                self.name,
                self.scalar.name()
            );
        }
        let bind = BindParameter::new(start_number, Direction::Input, kind, size, value);

        if !self.direction.has_output() {
            return Ok(InputFragment {
                declare: None,
                argument: format!(":{start_number}"),
                binds: vec![bind],
                last_number: start_number + 1,
            });
        }

        let variable = variable_name(&self.name);
        let variable_type = self
            .variable_kind()
            .map_or("NUMBER", |kind| kind.variable_type());
        let (initializer, binds) = if self.direction.has_input() {
            (format!(":{start_number}"), vec![bind])
        } else {
            (String::from("NULL"), Vec::new())
        };
        let last_number = start_number + binds.len() as u32;

        Ok(InputFragment {
            declare: Some(declare_line(&variable, variable_type, &initializer)),
            argument: variable,
            binds,
            last_number,
        })
    }

    fn prepare_output(&self, start_number: u32) -> Result<Option<OutputFragment>> {
        if !self.direction.has_output() {
            return Ok(None);
        }

        let kind = self.variable_kind();
        let size = match kind {
            Some(OracleDbType::Varchar2) => Some(MAX_VARCHAR2_LENGTH),
            _ => None,
        };

        Ok(Some(OutputFragment {
            clause: format!(":{start_number} := {};", variable_name(&self.name)),
            bind: BindParameter::new(start_number, Direction::Output, kind, size, Value::Null),
            last_number: start_number + 1,
        }))
    }

    fn apply_output(&mut self, raw: RawOutput<'_>) -> Result<()> {
        check_output(&self.name, self.direction, self.applied)?;
        let RawOutput::Scalar(raw) = raw else {
            return Err(Error::UnexpectedOutput(format!(
                "`{}` expects a scalar, not a cursor",
                self.name
            )));
        };
        self.value = coerce(self.scalar, raw)?;
        self.applied = true;

        Ok(())
    }
}
