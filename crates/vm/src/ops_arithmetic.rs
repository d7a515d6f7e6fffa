//! Constants, arithmetic, and plain variable load/store.

use crate::error::VmError;
use crate::vm::{ExecOutcome, Vm};
use lit_core::Value;

fn numeric_pair(a: &Value, b: &Value) -> Option<(f64, f64, bool)> {
    let both_float = matches!(a, Value::Float(_)) || matches!(b, Value::Float(_));
    let af = match a {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        _ => return None,
    };
    let bf = match b {
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        _ => return None,
    };
    Some((af, bf, both_float))
}

fn wrap_numeric(both_float: bool, v: f64) -> Value {
    if both_float {
        Value::Float(v)
    } else {
        Value::Int(v as i64)
    }
}

/// Python's `%`: the result's sign follows the divisor, not the
/// dividend (`-7 % 2` is `1`, not `-1`). Rust's `%` follows the
/// dividend, so this can't be the built-in operator.
fn floor_mod(a: f64, b: f64) -> f64 {
    a - b * (a / b).floor()
}

impl Vm {
    pub(crate) fn op_push_const(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let dtype = tokens.get(1).map(String::as_str).unwrap_or_default();
        let raw_value = tokens.get(2).map(String::as_str).unwrap_or_default();

        let value = match dtype {
            "int" => raw_value
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.fatal(ip_of_line, format!("bad int literal: {raw_value}")))?,
            "float" => raw_value
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.fatal(ip_of_line, format!("bad float literal: {raw_value}")))?,
            "bool" => Value::Bool(raw_value.eq_ignore_ascii_case("true")),
            "str" => Value::Str(raw_value.replace("\\n", "\n")),
            "lambda" => Value::Lambda(raw_value.to_string()),
            "object" => {
                if raw_value == "null" {
                    Value::Object(None)
                } else {
                    return Err(self.fatal(
                        ip_of_line,
                        format!("unsupported object constant: {raw_value}"),
                    ));
                }
            }
            other => return Err(self.fatal(ip_of_line, format!("unknown PUSH_CONST dtype: {other}\n    {raw_line}"))),
        };

        self.stack.push(value);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_inc_dec(
        &mut self,
        op: &str,
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let value = self.pop(ip_of_line)?;
        let delta = if op == "INC" { 1.0 } else { -1.0 };
        let result = match value {
            Value::Int(i) => Value::Int(i + delta as i64),
            Value::Float(f) => Value::Float(f + delta),
            other => {
                return Err(self.fatal(
                    ip_of_line,
                    format!("cannot increment or decrement non-numeric value: {}", other.type_tag()),
                ))
            }
        };
        self.stack.push(result);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_compound_var(
        &mut self,
        op: &str,
        tokens: &[String],
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let var_name = tokens[1].clone();
        if !self.current_frame().contains_key(&var_name) {
            return Err(self.fatal(ip_of_line, format!("undefined variable: {var_name}")));
        }

        let b = self.pop(ip_of_line)?;
        let a = self.current_frame()[&var_name].clone();

        if let Value::Str(a_str) = &a {
            if op != "ADD_VAR" {
                return Err(self.fatal(ip_of_line, format!("cannot use {op} on str")));
            }
            let b_str = match &b {
                Value::Str(s) => s.clone(),
                other => other.display_payload(),
            };
            *self.current_frame_mut().get_mut(&var_name).unwrap() =
                Value::Str(format!("{a_str}{b_str}"));
            return Ok(ExecOutcome::Continue);
        }

        let Some((af, bf, both_float)) = numeric_pair(&a, &b) else {
            return Err(self.fatal(
                ip_of_line,
                format!("type error: {} {op} {}", a.type_tag(), b.type_tag()),
            ));
        };

        if op == "MOD_VAR" && both_float {
            return Err(self.fatal(ip_of_line, "cannot use %= with float"));
        }
        if (op == "DIV_VAR" || op == "MOD_VAR") && bf == 0.0 {
            return Err(self.fatal(ip_of_line, "division by zero"));
        }

        let result = match op {
            "ADD_VAR" => af + bf,
            "SUB_VAR" => af - bf,
            "MUL_VAR" => af * bf,
            "DIV_VAR" => af / bf,
            "MOD_VAR" => floor_mod(af, bf),
            _ => unreachable!(),
        };

        *self.current_frame_mut().get_mut(&var_name).unwrap() = wrap_numeric(both_float, result);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_arith(
        &mut self,
        op: &str,
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let b = self.pop(ip_of_line)?;
        let a = self.pop(ip_of_line)?;

        let Some((af, bf, both_float)) = numeric_pair(&a, &b) else {
            return Err(self.fatal(
                ip_of_line,
                format!("type error: {} {op} {}", a.type_tag(), b.type_tag()),
            ));
        };

        if (op == "DIV" || op == "MOD") && bf == 0.0 {
            return Err(self.fatal(ip_of_line, "division by zero"));
        }

        // DIV of two ints: the Python original always performs true
        // division and then (by a bug in its own tagging logic) labels
        // the float quotient `int` anyway. `Value` is a real tagged
        // union here, so an `int`-tagged result has to carry an `i64`
        // payload; we truncate toward zero rather than resurrect that
        // mistagging. See DESIGN.md's open questions.
        let result = match op {
            "ADD" => af + bf,
            "SUB" => af - bf,
            "MUL" => af * bf,
            "DIV" => af / bf,
            "MOD" => floor_mod(af, bf),
            _ => unreachable!(),
        };

        self.stack.push(wrap_numeric(both_float, result));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_add_str(
        &mut self,
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let b = self.pop(ip_of_line)?;
        let a = self.pop(ip_of_line)?;

        let a_str = match a {
            Value::Str(s) => s,
            other => other.display_payload(),
        };
        let b_str = match b {
            Value::Str(s) => s,
            other => other.display_payload(),
        };

        self.stack.push(Value::Str(format!("{a_str}{b_str}")));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_store_var(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let var_name = tokens[1].clone();
        let value = self.pop(ip_of_line)?;
        self.current_frame_mut().insert(var_name, value);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_load_var(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let var_name = &tokens[1];
        let value = self
            .current_frame()
            .get(var_name)
            .cloned()
            .ok_or_else(|| self.fatal(ip_of_line, format!("undefined variable: {var_name}")))?;
        self.stack.push(value);
        Ok(ExecOutcome::Continue)
    }
}
