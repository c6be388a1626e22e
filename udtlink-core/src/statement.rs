//! Assembly of a procedure call's anonymous PL/SQL block.

use alloc::{string::String, vec::Vec};
use core::fmt::Write;

use crate::{
    BindParameter, BindSink, InputFragment, Marshaller, OutputFragment, Result,
};

/// Assembles the statement calling one stored procedure.
///
/// ```
/// use udtlink_core::{Direction, Parameter, StatementAssembler};
///
/// let parameters = [
///     Parameter::native("P_ID", Direction::Input, &7i64).unwrap(),
///     Parameter::managed_boolean("P_FOUND", Direction::Output, None),
/// ];
/// let statement = StatementAssembler::new("HR.FIND_EMP").assemble(&parameters).unwrap();
///
/// assert_eq!(
///     statement.text(),
///     "DECLARE\n  v_p_found BOOLEAN := NULL;\nBEGIN\n  HR.FIND_EMP(P_ID => :1, P_FOUND => v_p_found);\n  \
///      :2 := CASE WHEN v_p_found THEN 1 WHEN NOT v_p_found THEN 0 ELSE NULL END;\nEND;"
/// );
/// assert_eq!(statement.binds().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StatementAssembler {
    procedure: String,
}

impl StatementAssembler {
    /// An assembler calling `procedure`.
    pub fn new(procedure: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
        }
    }

    /// The procedure's name.
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    /// Renders the input halves in list order, threading `next` through them.
    pub fn prepare_input<M: Marshaller>(
        &self,
        parameters: &[M],
        next: &mut u32,
    ) -> Result<Vec<InputFragment>> {
        parameters
            .iter()
            .map(|parameter| {
                let fragment = parameter.prepare_input(*next)?;
                *next = fragment.last_number;
                Ok(fragment)
            })
            .collect()
    }

    /// Renders the output halves in list order, threading `next` through them.
    pub fn prepare_output<M: Marshaller>(
        &self,
        parameters: &[M],
        next: &mut u32,
    ) -> Result<Vec<Option<OutputFragment>>> {
        parameters
            .iter()
            .map(|parameter| {
                let fragment = parameter.prepare_output(*next)?;
                if let Some(fragment) = &fragment {
                    *next = fragment.last_number;
                }
                Ok(fragment)
            })
            .collect()
    }

    /// Assembles the whole statement, numbering placeholders from `1`.
    pub fn assemble<M: Marshaller>(&self, parameters: &[M]) -> Result<Statement> {
        let mut next = 1;
        let inputs = self.prepare_input(parameters, &mut next)?;
        let outputs = self.prepare_output(parameters, &mut next)?;

        let mut text = String::new();
        let mut declares = inputs.iter().filter_map(|input| input.declare.as_deref()).peekable();
        if declares.peek().is_some() {
            text.push_str("DECLARE\n");
            for declare in declares {
                let _ = writeln!(text, "  {declare}");
            }
        }
        let _ = write!(text, "BEGIN\n  {}(", self.procedure);
        for (i, (parameter, input)) in parameters.iter().zip(&inputs).enumerate() {
            if i > 0 {
                text.push_str(", ");
            }
            let _ = write!(text, "{} => {}", parameter.name(), input.argument);
        }
        text.push_str(");\n");
        for output in outputs.iter().flatten() {
            let _ = writeln!(text, "  {}", output.clause);
        }
        text.push_str("END;");

        let routes = outputs
            .iter()
            .enumerate()
            .filter_map(|(index, output)| {
                output.as_ref().map(|output| OutputRoute {
                    parameter: index,
                    bind_number: output.bind.number(),
                })
            })
            .collect();

        let binds = inputs
            .into_iter()
            .flat_map(|input| input.binds)
            .chain(outputs.into_iter().flatten().map(|output| output.bind))
            .collect();
        trace!("Assembled call of `{}`:\n{text}", self.procedure);

        Ok(Statement {
            text,
            binds,
            outputs: routes,
        })
    }
}

/// Which parameter receives the value of which output bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRoute {
    parameter: usize,
    bind_number: u32,
}

impl OutputRoute {
    /// The parameter's index in the assembled list.
    pub fn parameter(&self) -> usize {
        self.parameter
    }

    /// The placeholder number of the bind carrying the value.
    pub fn bind_number(&self) -> u32 {
        self.bind_number
    }
}

/// An assembled statement: text, binds in placeholder order and output routes.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    binds: Vec<BindParameter>,
    outputs: Vec<OutputRoute>,
}

impl Statement {
    /// The anonymous PL/SQL block.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The binds; the one at position `n - 1` fills placeholder `:n`.
    pub fn binds(&self) -> &[BindParameter] {
        &self.binds
    }

    /// The output routes, in parameter order.
    pub fn outputs(&self) -> &[OutputRoute] {
        &self.outputs
    }

    /// Hands every bind to `sink`, in placeholder order.
    pub fn bind_to<S: BindSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for bind in &self.binds {
            sink.bind(
                &bind.name(),
                bind.direction(),
                bind.kind(),
                bind.size(),
                bind.value(),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::fixtures::{employee, Phone},
        Direction, Error, MetadataRegistry, OracleDbType, Parameter, RawOutput, Value,
    };
    use alloc::vec;
    use pretty_assertions::assert_eq;

    #[test_log::test]
    fn numbering_threads_through_parameters() {
        let registry = MetadataRegistry::new();
        let mut employee = employee();
        employee.phones.truncate(1);
        let parameters = [
            Parameter::object(&registry, "P_EMP", Direction::InputOutput, &employee).unwrap(),
            Parameter::native("P_NOTE", Direction::InputOutput, &String::from("hi")).unwrap(),
            Parameter::managed_boolean("P_OK", Direction::Output, None),
            Parameter::object_output::<Vec<Phone>>(&registry, "P_PHONES").unwrap(),
        ];

        let statement = StatementAssembler::new("HR.SYNC_EMP")
            .assemble(&parameters)
            .unwrap();
        assert_eq!(
            statement.text(),
            "DECLARE\n  \
             v_p_emp HR.EMP := HR.EMP(:1, :2, HR.ADDRESS(:3, :4), HR.PHONE_TBL(HR.PHONE(:5)));\n  \
             v_p_note VARCHAR2(32767) := :6;\n  \
             v_p_ok BOOLEAN := NULL;\n  \
             v_p_phones HR.PHONE_TBL := NULL;\n\
             BEGIN\n  \
             HR.SYNC_EMP(P_EMP => v_p_emp, P_NOTE => v_p_note, P_OK => v_p_ok, \
             P_PHONES => v_p_phones);\n  \
             OPEN :7 FOR SELECT v_p_emp.ID AS ID, v_p_emp.NAME AS NAME, \
             v_p_emp.ADDRESS AS ADDRESS, v_p_emp.PHONES AS PHONES \
             FROM DUAL WHERE v_p_emp IS NOT NULL;\n  \
             :8 := v_p_note;\n  \
             :9 := CASE WHEN v_p_ok THEN 1 WHEN NOT v_p_ok THEN 0 ELSE NULL END;\n  \
             OPEN :10 FOR SELECT * FROM TABLE(v_p_phones);\n\
             END;"
        );

        let numbers: Vec<_> = statement.binds().iter().map(BindParameter::number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
        assert_eq!(
            statement.binds()[5],
            BindParameter::new(
                6,
                Direction::Input,
                Some(OracleDbType::Varchar2),
                Some(2),
                Value::Text("hi".into())
            )
        );
        assert_eq!(
            statement.binds()[7],
            BindParameter::new(
                8,
                Direction::Output,
                Some(OracleDbType::Varchar2),
                Some(crate::MAX_VARCHAR2_LENGTH),
                Value::Null
            )
        );
        assert_eq!(
            statement
                .outputs()
                .iter()
                .map(|route| (route.parameter(), route.bind_number()))
                .collect::<Vec<_>>(),
            vec![(0, 7), (1, 8), (2, 9), (3, 10)]
        );
    }

    #[test]
    fn second_parameter_starts_after_first() {
        let registry = MetadataRegistry::new();
        let parameters = [
            Parameter::object(&registry, "P_A", Direction::Input, &employee()).unwrap(),
            Parameter::native("P_B", Direction::Input, &1i32).unwrap(),
        ];
        let assembler = StatementAssembler::new("HR.PROC");

        let mut next = 1;
        let inputs = assembler.prepare_input(&parameters[..1], &mut next).unwrap();
        assert_eq!(inputs[0].binds.len(), 6);
        assert_eq!(next, 7);

        let mut next = 1;
        let mut employee = employee();
        employee.phones.pop();
        let parameters = [
            Parameter::object(&registry, "P_A", Direction::Input, &employee).unwrap(),
            parameters.into_iter().nth(1).unwrap(),
        ];
        let inputs = assembler.prepare_input(&parameters, &mut next).unwrap();
        assert_eq!(inputs[0].last_number, 6);
        assert_eq!(inputs[1].argument, ":6");
        assert_eq!(next, 7);
        assert_eq!(assembler.prepare_output(&parameters, &mut next).unwrap(), vec![None, None]);
        assert_eq!(next, 7);
    }

    #[test]
    fn no_declare_section_without_variables() {
        let parameters = [Parameter::native("P_ID", Direction::Input, &1i64).unwrap()];
        let statement = StatementAssembler::new("HR.TOUCH").assemble(&parameters).unwrap();

        assert_eq!(statement.text(), "BEGIN\n  HR.TOUCH(P_ID => :1);\nEND;");
        assert!(statement.outputs().is_empty());

        let statement = StatementAssembler::new("HR.PING")
            .assemble::<Parameter>(&[])
            .unwrap();
        assert_eq!(statement.text(), "BEGIN\n  HR.PING();\nEND;");
    }

    #[test]
    fn binds_reach_the_sink() {
        let parameters = [
            Parameter::native("P_ID", Direction::Input, &1i64).unwrap(),
            Parameter::managed_boolean("P_OK", Direction::InputOutput, Some(true)),
        ];
        let statement = StatementAssembler::new("HR.CHECK").assemble(&parameters).unwrap();

        let mut sink: Vec<BindParameter> = Vec::new();
        statement.bind_to(&mut sink).unwrap();
        assert_eq!(sink, statement.binds());
    }

    #[test]
    fn routed_outputs_feed_back() {
        let mut parameters = [
            Parameter::native_output::<i32>("P_COUNT").unwrap(),
            Parameter::managed_boolean("P_OK", Direction::Output, None),
        ];
        let statement = StatementAssembler::new("HR.STATS").assemble(&parameters).unwrap();
        assert_eq!(
            statement.text(),
            "DECLARE\n  \
             v_p_count NUMBER(10) := NULL;\n  \
             v_p_ok BOOLEAN := NULL;\n\
             BEGIN\n  \
             HR.STATS(P_COUNT => v_p_count, P_OK => v_p_ok);\n  \
             :1 := v_p_count;\n  \
             :2 := CASE WHEN v_p_ok THEN 1 WHEN NOT v_p_ok THEN 0 ELSE NULL END;\n\
             END;"
        );

        // What a driver would read back, by placeholder number.
        let returned = |number: u32| match number {
            1 => Value::Int32(4),
            2 => Value::Int16(1),
            _ => Value::Null,
        };
        for route in statement.outputs() {
            parameters[route.parameter()]
                .apply_output(RawOutput::Scalar(returned(route.bind_number())))
                .unwrap();
        }

        assert_eq!(parameters[0].value_as::<i32>().unwrap(), 4);
        assert_eq!(parameters[1].value_as::<Option<bool>>().unwrap(), Some(true));
        assert!(matches!(
            parameters[1].apply_output(RawOutput::Scalar(Value::Null)),
            Err(Error::OutputAlreadyApplied(_))
        ));
    }
}
