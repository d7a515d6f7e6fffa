//! Standard stream I/O and the diagnostic dump.

use crate::error::VmError;
use crate::vm::{ExecOutcome, Vm};
use lit_core::Value;
use std::io::{self, Write};

fn format_array(v: &Value) -> String {
    match v {
        Value::Array(a) => {
            let data = &a.borrow().data;
            let rendered: Vec<String> = data
                .iter()
                .map(|slot| match slot {
                    Some(val) => val.display_payload(),
                    None => "None".to_string(),
                })
                .collect();
            format!("[{}]", rendered.join(", "))
        }
        _ => unreachable!(),
    }
}

/// A structured field-by-field dump, used for `PRINT` on a non-null
/// object.
fn format_object(v: &Value) -> String {
    match v {
        Value::Object(None) => "null".to_string(),
        Value::Object(Some(o)) => {
            let obj = o.borrow();
            let fields: Vec<String> = obj
                .fields
                .iter()
                .map(|(name, (_, value))| match value {
                    Some(v) => format!("{name}: {}", v.display_payload()),
                    None => format!("{name}: <uninit>"),
                })
                .collect();
            format!("{} {{ {} }}", obj.class_name, fields.join(", "))
        }
        _ => unreachable!(),
    }
}

fn format_for_print(v: &Value) -> String {
    match v {
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Array(_) => format_array(v),
        Value::Object(_) => format_object(v),
        Value::Tuple(_) => v.display_payload(),
        other => other.display_payload(),
    }
}

impl Vm {
    pub(crate) fn op_print(
        &mut self,
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        if let Some(value) = self.stack.pop() {
            println!("{}", format_for_print(&value));
        } else {
            println!();
        }
        let _ = ip_of_line;
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_input(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        _raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let dtype = tokens.get(1).map(String::as_str).unwrap_or("str");
        if let Some(prompt) = tokens.get(2) {
            print!("{prompt}");
            let _ = io::stdout().flush();
        }

        let mut line = String::new();
        io::stdin()
            .read_line(&mut line)
            .map_err(|e| self.fatal(ip_of_line, format!("failed to read input: {e}")))?;
        let line = line.trim_end_matches(['\n', '\r']);

        let value = match dtype {
            "int" => line
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| self.fatal(ip_of_line, "invalid int input"))?,
            "float" => line
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| self.fatal(ip_of_line, "invalid float input"))?,
            "bool" => {
                let lower = line.to_ascii_lowercase();
                Value::Bool(matches!(lower.as_str(), "true" | "1" | "y" | "yes"))
            }
            _ => Value::Str(line.to_string()),
        };

        self.stack.push(value);
        Ok(ExecOutcome::Continue)
    }

    /// The `[STACK]`/`[FRAME_STACK]` portion shared by `DUMP` and `HALT`.
    pub(crate) fn dump_stack_and_frames(&self) {
        println!("[STACK]");
        for v in &self.stack {
            println!("  {}", v.display_payload());
        }

        println!("[FRAME_STACK]");
        for frame in &self.frame_stack {
            for (name, value) in frame {
                println!("  {name} = {}", value.display_payload());
            }
        }
    }

    pub(crate) fn op_dump(&mut self, raw_line: &str) -> Result<ExecOutcome, VmError> {
        println!("[IP={}]: {}", self.ip, raw_line.trim());

        self.dump_stack_and_frames();

        println!("[TRY_STACK]");
        for entry in &self.try_stack {
            println!(
                "  catch {} -> ip {}",
                entry.caught_class, entry.handler_ip
            );
        }

        println!("[CLASSES]");
        for (name, class) in &self.classes {
            println!(
                "  {name}: fields={:?} methods={:?} super={:?} interfaces={:?}",
                class.fields.keys().collect::<Vec<_>>(),
                class.methods.keys().collect::<Vec<_>>(),
                class.super_class,
                class.interfaces
            );
        }

        Ok(ExecOutcome::Continue)
    }
}
