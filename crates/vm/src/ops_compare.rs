//! Comparisons, boolean logic, and runtime type queries.

use crate::error::VmError;
use crate::vm::{ExecOutcome, Vm};
use lit_core::{TAG_BOOL, TAG_FLOAT, TAG_INT, TAG_LAMBDA, TAG_STR, Value};

fn numeric_value(v: &Value) -> Option<f64> {
    match v {
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

impl Vm {
    pub(crate) fn op_compare(
        &mut self,
        op: &str,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let b = self.pop(ip_of_line)?;
        let a = self.pop(ip_of_line)?;

        if a.type_tag() != b.type_tag() {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "type mismatch in compare: {} vs {}\n    {raw_line}",
                    a.type_tag(),
                    b.type_tag()
                ),
            ));
        }

        let result = match op {
            "EQ" => a == b,
            "NEQ" => a != b,
            "LT" | "GT" | "LTE" | "GTE" => {
                let ord = if let (Some(af), Some(bf)) = (numeric_value(&a), numeric_value(&b)) {
                    af.partial_cmp(&bf)
                } else if let (Value::Str(sa), Value::Str(sb)) = (&a, &b) {
                    Some(sa.cmp(sb))
                } else if let (Value::Bool(ba), Value::Bool(bb)) = (&a, &b) {
                    Some(ba.cmp(bb))
                } else {
                    None
                };
                let Some(ord) = ord else {
                    return Err(self.fatal(
                        ip_of_line,
                        format!(
                            "values of type {} are not orderable\n    {raw_line}",
                            a.type_tag()
                        ),
                    ));
                };
                match op {
                    "LT" => ord.is_lt(),
                    "GT" => ord.is_gt(),
                    "LTE" => ord.is_le(),
                    "GTE" => ord.is_ge(),
                    _ => unreachable!(),
                }
            }
            _ => unreachable!(),
        };

        self.stack.push(Value::Bool(result));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_bool_binop(
        &mut self,
        op: &str,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let b = self.pop(ip_of_line)?;
        let a = self.pop(ip_of_line)?;

        let (Value::Bool(a), Value::Bool(b)) = (&a, &b) else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "type error: {op} only supports bool, got {} and {}\n    {raw_line}",
                    a.type_tag(),
                    b.type_tag()
                ),
            ));
        };

        let result = if op == "AND" { *a && *b } else { *a || *b };
        self.stack.push(Value::Bool(result));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_not(
        &mut self,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let a = self.pop(ip_of_line)?;
        let Value::Bool(b) = a else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "type error: NOT only supports bool, got {}\n    {raw_line}",
                    a.type_tag()
                ),
            ));
        };
        self.stack.push(Value::Bool(!b));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_type_of(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let target_type = &tokens[1];
        let value = self.pop(ip_of_line)?;

        let result = match value.type_tag() {
            TAG_INT | TAG_FLOAT | TAG_BOOL | TAG_STR | TAG_LAMBDA => {
                value.type_tag() == target_type
            }
            _ => false,
        };

        self.stack.push(Value::Bool(result));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_instance_of(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let target_class = tokens[1].clone();
        let value = self.pop(ip_of_line)?;

        let Value::Object(obj) = &value else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected object for INSTANCE_OF, got {}\n    {raw_line}",
                    value.type_tag()
                ),
            ));
        };

        self.load_class(&target_class)?;

        let Some(obj_ref) = obj else {
            self.stack.push(Value::Bool(false));
            return Ok(ExecOutcome::Continue);
        };

        let mut current = Some(obj_ref.borrow().class_name.clone());
        while let Some(class_name) = current {
            if class_name == target_class {
                self.stack.push(Value::Bool(true));
                return Ok(ExecOutcome::Continue);
            }
            let class = &self.classes[&class_name];
            if class.interfaces.iter().any(|i| i == &target_class) {
                self.stack.push(Value::Bool(true));
                return Ok(ExecOutcome::Continue);
            }
            current = class.super_class.clone();
        }

        self.stack.push(Value::Bool(false));
        Ok(ExecOutcome::Continue)
    }
}
