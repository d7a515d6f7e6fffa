//! Fixed-size, heterogeneous tuples.

use crate::error::VmError;
use crate::vm::{ExecOutcome, Vm};
use lit_core::Value;
use std::rc::Rc;

impl Vm {
    pub(crate) fn op_new_tuple(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let size: usize = tokens[1]
            .parse()
            .map_err(|_| self.fatal(ip_of_line, format!("bad tuple size: {}\n    {raw_line}", tokens[1])))?;

        let mut items = Vec::with_capacity(size);
        for _ in 0..size {
            items.push(self.pop(ip_of_line)?);
        }
        items.reverse();

        self.stack.push(Value::Tuple(Rc::new(items)));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_tuple_get(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let idx: i64 = tokens[1]
            .parse()
            .map_err(|_| self.fatal(ip_of_line, format!("bad tuple index: {}\n    {raw_line}", tokens[1])))?;

        let tuple_val = self.pop(ip_of_line)?;
        let Value::Tuple(items) = &tuple_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected tuple for TUPLE_GET, got {}\n    {raw_line}",
                    tuple_val.type_tag()
                ),
            ));
        };

        if idx < 0 || idx as usize >= items.len() {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "index out of range: {idx}, length is {}\n    {raw_line}",
                    items.len()
                ),
            ));
        }

        self.stack.push(items[idx as usize].clone());
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_unpack_tuple(
        &mut self,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let tuple_val = self.pop(ip_of_line)?;
        let Value::Tuple(items) = &tuple_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "cannot unpack not tuple: {}\n    {raw_line}",
                    tuple_val.type_tag()
                ),
            ));
        };

        for item in items.iter().rev() {
            self.stack.push(item.clone());
        }
        Ok(ExecOutcome::Continue)
    }
}
