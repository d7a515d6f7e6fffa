//! Jumps, calls, returns, and process control.

use crate::error::VmError;
use crate::vm::{ExecOutcome, Vm};
use lit_core::{Frame, Value};
use std::time::Duration;

impl Vm {
    pub(crate) fn op_jump(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let label = &tokens[1];
        let target = self
            .label_line(label)
            .ok_or_else(|| self.fatal(ip_of_line, format!("cannot find label: {label}")))?;
        self.ip = target + 1;
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_jump_if_false(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let label = &tokens[1];
        let target = self
            .label_line(label)
            .ok_or_else(|| self.fatal(ip_of_line, format!("cannot find label: {label}")))?;

        let cond = match self.pop(ip_of_line)? {
            Value::Bool(b) => b,
            other => {
                return Err(self.fatal(
                    ip_of_line,
                    format!("expected bool for JUMP_IF_FALSE, got: {}", other.type_tag()),
                ))
            }
        };

        if !cond {
            self.ip = target + 1;
        }
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_call(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let func_name = &tokens[1];
        let target = self
            .label_line(func_name)
            .ok_or_else(|| self.fatal(ip_of_line, format!("function: {func_name} is not found")))?;

        self.call_stack.push(self.ip);
        self.frame_stack.push(Frame::new());
        self.ip = target + 1;
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_call_dynamic(
        &mut self,
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let label_name = match self.pop(ip_of_line)? {
            Value::Lambda(l) => l,
            other => {
                return Err(self.fatal(
                    ip_of_line,
                    format!("expected lambda, got {}", other.type_tag()),
                ))
            }
        };
        let target = self
            .label_line(&label_name)
            .ok_or_else(|| self.fatal(ip_of_line, format!("lambda {label_name} not found")))?;

        self.call_stack.push(self.ip);
        self.frame_stack.push(Frame::new());
        self.ip = target + 1;
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_ret(
        &mut self,
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        if self.call_stack.is_empty() {
            return Err(self.fatal(ip_of_line, "RET without a matching CALL"));
        }
        self.frame_stack.pop();
        self.ip = self.call_stack.pop().unwrap();
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_halt(&mut self, tokens: &[String]) -> Result<ExecOutcome, VmError> {
        let code = tokens
            .get(1)
            .map(|s| s.parse::<i32>().unwrap_or(0))
            .unwrap_or(0);
        tracing::debug!(code, "HALT");
        self.dump_stack_and_frames();
        Ok(ExecOutcome::Halt(code))
    }

    pub(crate) fn op_sleep(
        &mut self,
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let millis = match self.pop(ip_of_line)? {
            Value::Int(i) if i >= 0 => i as u64,
            other => {
                return Err(self.fatal(
                    ip_of_line,
                    format!("illegal argument for SLEEP: {}", other.type_tag()),
                ))
            }
        };
        std::thread::sleep(Duration::from_millis(millis));
        Ok(ExecOutcome::Continue)
    }
}
