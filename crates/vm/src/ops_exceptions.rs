//! `TRY` / `END_TRY` / `THROW`.

use crate::error::VmError;
use crate::vm::{ExecOutcome, TryEntry, Vm};
use lit_core::{Frame, Value};

/// Mirrors Python truthiness for the "is this actually an exception
/// object" check in `THROW`: `None`, `""`, `0`, `0.0` and `false` are
/// all falsy.
fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Bool(b) => *b,
        Value::Str(s) => !s.is_empty(),
        Value::Object(o) => o.is_some(),
        Value::Lambda(_) | Value::Tuple(_) | Value::Array(_) => true,
    }
}

impl Vm {
    pub(crate) fn op_try(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let catch_class = tokens[1].clone();
        let catch_label = &tokens[2];

        self.load_class(&catch_class)?;

        let catch_ip = self.label_line(catch_label).ok_or_else(|| {
            self.fatal(
                ip_of_line,
                format!("catch label: {catch_label} is not found\n    {raw_line}"),
            )
        })?;

        let frame_snapshot: Vec<Frame> = self.frame_stack.clone();

        self.try_stack.push(TryEntry {
            handler_ip: catch_ip + 1,
            caught_class: catch_class,
            frame_snapshot,
        });
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_end_try(
        &mut self,
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        if self.try_stack.pop().is_none() {
            return Err(self.fatal(ip_of_line, "END_TRY used without TRY"));
        }
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_throw(
        &mut self,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let thrown = self.pop(ip_of_line)?;

        let Value::Object(Some(obj_ref)) = &thrown else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected object for THROW, got {}\n    {raw_line}",
                    thrown.type_tag()
                ),
            ));
        };

        let (exception_class, is_exception_like) = {
            let obj = obj_ref.borrow();
            let description = obj.fields.get("description").and_then(|(_, v)| v.as_ref());
            let is_exception_like = description.is_some_and(is_truthy);
            (obj.class_name.clone(), is_exception_like)
        };

        if !is_exception_like {
            return Err(self.fatal(
                ip_of_line,
                format!("class: {exception_class} is not an Exception class\n    {raw_line}"),
            ));
        }

        while let Some(entry) = self.try_stack.pop() {
            if entry.caught_class == exception_class {
                self.frame_stack = entry.frame_snapshot;
                self.ip = entry.handler_ip;
                self.this = Some(thrown);
                return Ok(ExecOutcome::Continue);
            }
        }

        let description = {
            let obj = obj_ref.borrow();
            obj.fields
                .get("description")
                .and_then(|(_, v)| v.as_ref())
                .map(Value::display_payload)
                .unwrap_or_default()
        };

        Err(self.fatal(
            ip_of_line,
            format!("uncaught exception: {exception_class}: {description}"),
        ))
    }
}
