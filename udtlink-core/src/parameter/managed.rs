use alloc::{format, string::String, vec, vec::Vec};

use super::{check_output, InputFragment, Marshaller, OutputFragment, RawOutput};
use crate::{
    convert::decode_tristate,
    metadata::{declare_line, variable_name},
    BindParameter, Direction, Error, OracleDbType, Result, Value,
};

/// A scalar parameter whose remote type the driver can't bind, passed through a PL/SQL variable.
///
/// The value crosses the driver boundary in a tri-state numeric encoding (`1`, `0` or `NULL`)
/// and is converted to and from the variable's type in PL/SQL.
#[derive(Debug)]
pub struct ScalarManagedParam {
    name: String,
    direction: Direction,
    value: Value,
    applied: bool,
}

impl ScalarManagedParam {
    /// A PL/SQL `BOOLEAN` parameter.
    pub fn boolean(name: &str, direction: Direction, value: Option<bool>) -> Self {
        Self {
            name: name.into(),
            direction,
            value: value.map_or(Value::Null, Value::Boolean),
            applied: false,
        }
    }

    fn encoded(&self) -> Value {
        match self.value {
            Value::Boolean(true) => Value::Int16(1),
            Value::Boolean(false) => Value::Int16(0),
            _ => Value::Null,
        }
    }
}

impl Marshaller for ScalarManagedParam {
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
        let variable = variable_name(&self.name);
        let (initializer, binds, last_number) = if self.direction.has_input() {
            let bind = BindParameter::new(
                start_number,
                Direction::Input,
                Some(OracleDbType::Int16),
                None,
                self.encoded(),
            );
            let initializer = format!(
                "CASE :{start_number} WHEN 1 THEN TRUE WHEN 0 THEN FALSE ELSE NULL END"
            );
            (initializer, vec![bind], start_number + 1)
        } else {
            (String::from("NULL"), Vec::new(), start_number)
        };

        Ok(InputFragment {
            declare: Some(declare_line(&variable, "BOOLEAN", &initializer)),
            argument: variable,
            binds,
            last_number,
        })
    }

    fn prepare_output(&self, start_number: u32) -> Result<Option<OutputFragment>> {
        if !self.direction.has_output() {
            return Ok(None);
        }

        let variable = variable_name(&self.name);
        Ok(Some(OutputFragment {
            clause: format!(
                ":{start_number} := CASE WHEN {variable} THEN 1 \
                 WHEN NOT {variable} THEN 0 ELSE NULL END;"
            ),
            bind: BindParameter::new(
                start_number,
                Direction::Output,
                Some(OracleDbType::Int16),
                None,
                Value::Null,
            ),
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
        self.value = decode_tristate(raw)?.map_or(Value::Null, Value::Boolean);
        self.applied = true;

        Ok(())
    }
}
