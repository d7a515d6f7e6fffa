//! Per-activation local variable bindings.

use crate::value::Value;
use indexmap::IndexMap;

/// A single call/method/constructor activation's local variables.
/// Created on every `CALL`, `CALL_DYNAMIC`, `CALL_METHOD`,
/// `CALL_STATIC_METHOD`, `CALL_SUPER_METHOD`, `NEW`, `NEW_GENERIC_OBJ`,
/// and static-initialiser entry; destroyed on the matching `RET`.
pub type Frame = IndexMap<String, Value>;
