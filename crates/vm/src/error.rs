//! The fatal VM diagnostic.
//!
//! Every semantic error a running program can trigger (type mismatch,
//! missing label, missing field, unbound variable, bad literal, stack
//! underflow, arity mismatch, index out of range, `RET` without a
//! matching `CALL`, `THROW` without a handler, double initialisation of
//! a field, an uninitialised static-field load) is reported through this
//! single type. It bypasses the try stack entirely: there is no
//! program-visible way to catch a `VmError`.
//!
//! A hand-written `Display`-based error type rather than a `thiserror`
//! derive hierarchy, matching the rest of this workspace: neither
//! `thiserror` nor `anyhow` appears anywhere in its dependency tree.

use std::fmt;

/// A fatal VM error, tagged with enough source context to reproduce the
/// diagnostic: file path, `ip`, the offending line text, and a
/// human-readable message.
#[derive(Debug)]
pub struct VmError {
    pub path: String,
    pub ip: usize,
    pub line: String,
    pub message: String,
}

impl VmError {
    pub fn new(path: impl Into<String>, ip: usize, line: impl Into<String>, message: impl Into<String>) -> Self {
        VmError {
            path: path.into(),
            ip,
            line: line.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}\n    {}",
            self.path, self.ip, self.message, self.line
        )
    }
}

impl std::error::Error for VmError {}
