//! Execution state and the main dispatch loop.

use crate::config::VmConfig;
use crate::error::VmError;
use crate::program::ProgramIndex;
use lit_core::{split_line, Class, Frame, Value};
use std::collections::{HashMap, HashSet};

/// One entry on the `try_stack`: where to resume, which class name the
/// handler catches, and the frame-stack snapshot to restore on a match.
#[derive(Debug)]
pub struct TryEntry {
    pub handler_ip: usize,
    pub caught_class: String,
    pub frame_snapshot: Vec<Frame>,
}

/// What happened after interpreting one line.
#[derive(Debug)]
pub enum ExecOutcome {
    Continue,
    Halt(i32),
}

/// The interpreter. Owns every piece of mutable execution state: the
/// operand stack, the frame/call/try stacks, the lazily-populated class
/// table, and `ip`. Nothing here is shared across threads — execution is
/// single-threaded and synchronous by design (`SLEEP` blocks this whole
/// struct's owner).
pub struct Vm {
    pub(crate) path: String,
    pub(crate) lines: Vec<String>,
    pub(crate) index: ProgramIndex,
    pub(crate) classes: HashMap<String, Class>,
    pub(crate) loading: HashSet<String>,
    pub(crate) config: VmConfig,

    pub ip: usize,
    pub stack: Vec<Value>,
    pub frame_stack: Vec<Frame>,
    pub call_stack: Vec<usize>,
    pub try_stack: Vec<TryEntry>,
    pub this: Option<Value>,
}

impl Vm {
    pub fn new(path: impl Into<String>, lines: Vec<String>, config: VmConfig) -> Self {
        let index = ProgramIndex::build(&lines);
        Vm {
            path: path.into(),
            lines,
            index,
            classes: HashMap::new(),
            loading: HashSet::new(),
            config,
            ip: 0,
            stack: Vec::new(),
            frame_stack: vec![Frame::new()],
            call_stack: Vec::new(),
            try_stack: Vec::new(),
            this: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Look up a label, failing hard if it does not exist.
    pub(crate) fn label_line(&self, name: &str) -> Option<usize> {
        self.index.labels.get(name).copied()
    }

    pub(crate) fn has_class_position(&self, name: &str) -> bool {
        self.index.class_positions.contains_key(name)
    }

    pub(crate) fn class_position(&self, name: &str) -> Option<usize> {
        self.index.class_positions.get(name).copied()
    }

    pub fn current_frame(&self) -> &Frame {
        self.frame_stack
            .last()
            .expect("frame_stack is never empty: seeded at construction, popped only by RET")
    }

    pub fn current_frame_mut(&mut self) -> &mut Frame {
        self.frame_stack
            .last_mut()
            .expect("frame_stack is never empty: seeded at construction, popped only by RET")
    }

    /// Build a `VmError` pointing at the line the caller is currently
    /// executing (`ip` has already been advanced past it, hence `ip - 1`
    /// when available).
    pub(crate) fn fatal(&self, ip_of_line: usize, message: impl Into<String>) -> VmError {
        let line = self
            .lines
            .get(ip_of_line)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        VmError::new(self.path.clone(), ip_of_line, line, message)
    }

    pub(crate) fn pop(&mut self, ip_of_line: usize) -> Result<Value, VmError> {
        self.stack
            .pop()
            .ok_or_else(|| self.fatal(ip_of_line, "stack underflow"))
    }

    /// Load a class by name if it has not been loaded yet, recursing
    /// into `EXTENDS`/`IMPLEMENTS` targets first.
    pub fn load_class(&mut self, name: &str) -> Result<(), VmError> {
        crate::class_loader::load_class(self, name)
    }

    /// Run `class_name`'s static initialiser if it has one and has not
    /// already run. `Some(code)` means a `HALT` fired inside the
    /// initialiser and must be propagated as the current op's outcome.
    pub(crate) fn ensure_static_init(&mut self, class_name: &str) -> Result<Option<i32>, VmError> {
        crate::static_init::ensure_static_init(self, class_name)
    }

    /// Run to exhaustion: seeds `ip` at `main` and interprets until the
    /// program falls off the end, a `HALT` fires, or a fatal error
    /// occurs.
    pub fn run(&mut self) -> Result<i32, VmError> {
        let main_line = self.label_line("main").ok_or_else(|| {
            VmError::new(self.path.clone(), 0, "", "label 'main' is not found")
        })?;
        self.ip = main_line + 1;

        while self.ip < self.lines.len() {
            match self.execute_one()? {
                ExecOutcome::Continue => {}
                ExecOutcome::Halt(code) => return Ok(code),
            }
        }
        Ok(0)
    }

    /// Fetch the line at `ip`, advance `ip`, and dispatch it. `ip` is
    /// always left pointing at the next line to fetch; a control-flow
    /// opcode leaves it at its target instead of the line after itself.
    pub(crate) fn execute_one(&mut self) -> Result<ExecOutcome, VmError> {
        let ip_of_line = self.ip;
        let raw_line = self.lines[ip_of_line].clone();
        self.ip += 1;

        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            return Ok(ExecOutcome::Continue);
        }

        let tokens = split_line(&raw_line);
        if tokens.is_empty() {
            return Ok(ExecOutcome::Continue);
        }
        let op = tokens[0].to_ascii_uppercase();

        self.dispatch(&op, &tokens, ip_of_line, &raw_line)
    }

    fn dispatch(
        &mut self,
        op: &str,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        tracing::trace!(op, ip = ip_of_line, "dispatch");
        match op {
            "LABEL" => Ok(ExecOutcome::Continue),

            "PUSH_CONST" => self.op_push_const(tokens, ip_of_line, raw_line),
            "INC" | "DEC" => self.op_inc_dec(op, ip_of_line, raw_line),
            "ADD_VAR" | "SUB_VAR" | "MUL_VAR" | "DIV_VAR" | "MOD_VAR" => {
                self.op_compound_var(op, tokens, ip_of_line, raw_line)
            }
            "ADD" | "SUB" | "MUL" | "DIV" | "MOD" => self.op_arith(op, ip_of_line, raw_line),
            "ADD_STR" => self.op_add_str(ip_of_line, raw_line),

            "STORE_VAR" => self.op_store_var(tokens, ip_of_line, raw_line),
            "LOAD_VAR" => self.op_load_var(tokens, ip_of_line, raw_line),

            "PRINT" => self.op_print(ip_of_line, raw_line),
            "INPUT" => self.op_input(tokens, ip_of_line, raw_line),
            "DUMP" => self.op_dump(raw_line),

            "JUMP" => self.op_jump(tokens, ip_of_line, raw_line),
            "JUMP_IF_FALSE" => self.op_jump_if_false(tokens, ip_of_line, raw_line),
            "CALL" => self.op_call(tokens, ip_of_line, raw_line),
            "CALL_DYNAMIC" => self.op_call_dynamic(ip_of_line, raw_line),
            "RET" => self.op_ret(ip_of_line, raw_line),
            "HALT" => self.op_halt(tokens),
            "SLEEP" => self.op_sleep(ip_of_line, raw_line),

            "TRY" => self.op_try(tokens, ip_of_line, raw_line),
            "END_TRY" => self.op_end_try(ip_of_line, raw_line),
            "THROW" => self.op_throw(ip_of_line, raw_line),

            "NEW" => self.op_new(tokens, ip_of_line, raw_line),
            "NEW_GENERIC_OBJ" => self.op_new_generic_obj(tokens, ip_of_line, raw_line),
            "INIT_FIELD" => self.op_init_field(tokens, ip_of_line, raw_line),
            "UPDATE_FIELD" => self.op_update_field(tokens, ip_of_line, raw_line),
            "LOAD_FIELD" => self.op_load_field(tokens, ip_of_line, raw_line),
            "LOAD_THIS" => self.op_load_this(ip_of_line, raw_line),
            "SET_STATIC_FIELD" => self.op_set_static_field(tokens, ip_of_line, raw_line),
            "LOAD_STATIC_FIELD" => self.op_load_static_field(tokens, ip_of_line, raw_line),
            "CALL_METHOD" => self.op_call_method(tokens, ip_of_line, raw_line),
            "CALL_STATIC_METHOD" => self.op_call_static_method(tokens, ip_of_line, raw_line),
            "CALL_SUPER_METHOD" => self.op_call_super_method(tokens, ip_of_line, raw_line),

            "NEW_TUPLE" => self.op_new_tuple(tokens, ip_of_line, raw_line),
            "TUPLE_GET" => self.op_tuple_get(tokens, ip_of_line, raw_line),
            "UNPACK_TUPLE" => self.op_unpack_tuple(ip_of_line, raw_line),

            "NEW_ARRAY" => self.op_new_array(tokens, ip_of_line, raw_line),
            "INIT_ARRAY" => self.op_init_array(tokens, ip_of_line, raw_line),
            "NEW_GENERIC_ARRAY" => self.op_new_generic_array(tokens, ip_of_line, raw_line),
            "ARRAY_GET" => self.op_array_get(ip_of_line, raw_line),
            "ARRAY_SET" => self.op_array_set(ip_of_line, raw_line),
            "ARRAY_LEN" => self.op_array_len(ip_of_line, raw_line),

            "EQ" | "NEQ" | "LT" | "GT" | "LTE" | "GTE" => {
                self.op_compare(op, ip_of_line, raw_line)
            }
            "AND" | "OR" => self.op_bool_binop(op, ip_of_line, raw_line),
            "NOT" => self.op_not(ip_of_line, raw_line),
            "TYPE_OF" => self.op_type_of(tokens, ip_of_line, raw_line),
            "INSTANCE_OF" => self.op_instance_of(tokens, ip_of_line, raw_line),

            other => Err(self.fatal(ip_of_line, format!("not a statement: {other}"))),
        }
    }
}
