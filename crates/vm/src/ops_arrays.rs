//! Fixed-length, homogeneously-typed arrays.

use crate::error::VmError;
use crate::vm::{ExecOutcome, Vm};
use lit_core::{ArrayData, Value};
use std::cell::RefCell;
use std::rc::Rc;

impl Vm {
    pub(crate) fn op_new_array(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let elem_type = tokens[1].clone();
        let size = self.pop_array_size(ip_of_line, raw_line)?;

        let array = ArrayData::new(elem_type, size);
        self.stack
            .push(Value::Array(Rc::new(RefCell::new(array))));
        Ok(ExecOutcome::Continue)
    }

    /// `INIT_ARRAY <elem_type> _ _ <literal>...`: the size is popped from
    /// the stack (not read from the tokens), and the two tokens after
    /// the element type are unused filler before the literal values
    /// begin at token index 4 — preserved exactly as the bytecode format
    /// defines it.
    pub(crate) fn op_init_array(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let elem_type = tokens[1].clone();
        let size = self.pop_array_size(ip_of_line, raw_line)?;

        let mut values = Vec::with_capacity(size);
        for raw in &tokens[4..] {
            if values.len() > size {
                return Err(self.fatal(
                    ip_of_line,
                    format!("found more elements than expected: {}\n    {raw_line}", values.len()),
                ));
            }
            // Mirrors the original's `len(values) <= size` guard literally:
            // since it checks before appending, exactly one element beyond
            // `size` is tolerated before the next one trips the error above.
            let value = match elem_type.as_str() {
                "int" => raw
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| self.fatal(ip_of_line, format!("bad int literal: {raw}")))?,
                "float" => raw
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| self.fatal(ip_of_line, format!("bad float literal: {raw}")))?,
                "bool" => Value::Bool(raw.eq_ignore_ascii_case("true")),
                _ => Value::Str(raw.trim_matches('"').to_string()),
            };
            values.push(Some(value));
        }
        // Not padded to `size`: a literal list shorter than the declared
        // size simply leaves the array shorter, exactly as written.

        let array = ArrayData {
            elem_type,
            data: values,
        };
        self.stack
            .push(Value::Array(Rc::new(RefCell::new(array))));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_new_generic_array(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let generic_name = &tokens[1];
        let obj_val = self.pop(ip_of_line)?;

        let Value::Object(Some(obj_ref)) = &obj_val else {
            return Err(self.fatal(
                ip_of_line,
                format!("expected LOAD_THIS before using NEW_GENERIC_ARRAY\n    {raw_line}"),
            ));
        };
        let size = self.pop_array_size(ip_of_line, raw_line)?;

        let obj = obj_ref.borrow();
        let elem_type = obj
            .generic_map
            .as_ref()
            .and_then(|m| m.get(generic_name))
            .cloned()
            .ok_or_else(|| {
                self.fatal(
                    ip_of_line,
                    format!("unknown generic parameter: {generic_name}\n    {raw_line}"),
                )
            })?;
        drop(obj);

        let array = ArrayData::new(elem_type, size);
        self.stack
            .push(Value::Array(Rc::new(RefCell::new(array))));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_array_get(
        &mut self,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let array_val = self.pop(ip_of_line)?;
        let idx_val = self.pop(ip_of_line)?;

        let Value::Int(idx) = idx_val else {
            return Err(self.fatal(
                ip_of_line,
                format!("index must be int\n    {raw_line}"),
            ));
        };
        let Value::Array(arr) = &array_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected array for ARRAY_GET, got {}\n    {raw_line}",
                    array_val.type_tag()
                ),
            ));
        };

        let arr = arr.borrow();
        if idx < 0 || idx as usize >= arr.data.len() {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "index out of range: {idx}, length of array: {}\n    {raw_line}",
                    arr.data.len()
                ),
            ));
        }
        let value = arr.data[idx as usize].clone().ok_or_else(|| {
            self.fatal(ip_of_line, format!("array index {idx} is uninitialized\n    {raw_line}"))
        })?;
        drop(arr);

        self.stack.push(value);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_array_set(
        &mut self,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let array_val = self.pop(ip_of_line)?;
        let new_val = self.pop(ip_of_line)?;
        let idx_val = self.pop(ip_of_line)?;

        let Value::Int(idx) = idx_val else {
            return Err(self.fatal(ip_of_line, format!("index must be int\n    {raw_line}")));
        };
        let Value::Array(arr) = &array_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected array for ARRAY_SET, got {}\n    {raw_line}",
                    array_val.type_tag()
                ),
            ));
        };

        let mut arr = arr.borrow_mut();
        if new_val.type_tag() != arr.elem_type {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "type mismatch: expected {}, got {}\n    {raw_line}",
                    arr.elem_type,
                    new_val.type_tag()
                ),
            ));
        }
        if idx < 0 || idx as usize >= arr.data.len() {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "index out of range: {idx}, length of array: {}\n    {raw_line}",
                    arr.data.len()
                ),
            ));
        }

        arr.data[idx as usize] = Some(new_val);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_array_len(
        &mut self,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let array_val = self.pop(ip_of_line)?;
        let Value::Array(arr) = &array_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected array for ARRAY_LEN, got {}\n    {raw_line}",
                    array_val.type_tag()
                ),
            ));
        };
        let len = arr.borrow().data.len() as i64;
        self.stack.push(Value::Int(len));
        Ok(ExecOutcome::Continue)
    }

    fn pop_array_size(&mut self, ip_of_line: usize, raw_line: &str) -> Result<usize, VmError> {
        match self.pop(ip_of_line)? {
            Value::Int(i) if i >= 0 => Ok(i as usize),
            other => Err(self.fatal(
                ip_of_line,
                format!(
                    "expected int for array size, got {}\n    {raw_line}",
                    other.type_tag()
                ),
            )),
        }
    }
}
