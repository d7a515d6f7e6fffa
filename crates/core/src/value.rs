//! The tagged `Value` union.
//!
//! A `Value` carries its own runtime type tag by construction (the enum
//! discriminant); there is no separate static type discipline layered on
//! top of it. Field and array element declarations are plain type-tag
//! strings (`"int"`, `"object"`, a generic parameter name, ...) checked
//! against `Value::type_tag()` at the point of use.

use crate::object::{ArrayRef, ObjectRef};
use std::rc::Rc;

/// A declared type, as written in the bytecode (`FIELD <type> name`,
/// `NEW_ARRAY <type>`, ...). Left as an owned string rather than a closed
/// enum: besides the eight runtime tags below, it may also be a generic
/// parameter name awaiting resolution via an object's `generic_map`.
pub type TypeTag = String;

pub const TAG_INT: &str = "int";
pub const TAG_FLOAT: &str = "float";
pub const TAG_BOOL: &str = "bool";
pub const TAG_STR: &str = "str";
pub const TAG_LAMBDA: &str = "lambda";
pub const TAG_OBJECT: &str = "object";
pub const TAG_TUPLE: &str = "tuple";
pub const TAG_ARRAY: &str = "array";

/// One value on the operand stack, bound in a frame, or stored in a
/// field. `Object` and `Array` are shared, reference-counted handles:
/// cloning a `Value` never copies the fields or elements behind it.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    /// A label name, produced by `PUSH_CONST lambda <label>`.
    Lambda(String),
    /// `None` is the `null` object literal; `CALL_METHOD`/`LOAD_FIELD`
    /// on it are fatal, but `INSTANCE_OF` on it is simply `false`.
    Object(Option<ObjectRef>),
    Tuple(Rc<Vec<Value>>),
    Array(ArrayRef),
}

/// Render a float the way Python's `str(float)` does: an integral value
/// still shows a decimal point (`5.0`, not `5`).
fn format_float(f: f64) -> String {
    if f.is_finite() && f == f.trunc() {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

impl Value {
    /// The runtime type tag this value carries, matching the literal
    /// strings used in bytecode (`FIELD int x`, `TYPE_OF str`, ...).
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Int(_) => TAG_INT,
            Value::Float(_) => TAG_FLOAT,
            Value::Bool(_) => TAG_BOOL,
            Value::Str(_) => TAG_STR,
            Value::Lambda(_) => TAG_LAMBDA,
            Value::Object(_) => TAG_OBJECT,
            Value::Tuple(_) => TAG_TUPLE,
            Value::Array(_) => TAG_ARRAY,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Stringify for `ADD_STR`/`ADD_VAR` string concatenation and for the
    /// non-special-cased branch of `PRINT`.
    pub fn display_payload(&self) -> String {
        match self {
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Str(s) => s.clone(),
            Value::Lambda(l) => l.clone(),
            Value::Object(None) => "null".to_string(),
            Value::Object(Some(o)) => format!("{:?}", o.borrow()),
            Value::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(Value::display_payload).collect();
                format!("({})", inner.join(", "))
            }
            Value::Array(a) => format!("{:?}", a.borrow().data),
        }
    }
}

/// Equality used by `EQ`/`NEQ` (after the caller has already checked
/// both tags match). Shared-reference values (`Object`, `Array`) compare
/// by handle identity, not by deep structural equality: they model
/// mutable heap state, and two distinct objects with coincidentally
/// equal fields are not the same object. Primitives and tuples compare
/// by value.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => a == b,
            (Value::Object(None), Value::Object(None)) => true,
            (Value::Object(Some(a)), Value::Object(Some(b))) => Rc::ptr_eq(a, b),
            (Value::Object(_), Value::Object(_)) => false,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_match_bytecode_literals() {
        assert_eq!(Value::Int(1).type_tag(), "int");
        assert_eq!(Value::Float(1.0).type_tag(), "float");
        assert_eq!(Value::Bool(true).type_tag(), "bool");
        assert_eq!(Value::Str("x".into()).type_tag(), "str");
        assert_eq!(Value::Lambda("l".into()).type_tag(), "lambda");
        assert_eq!(Value::Object(None).type_tag(), "object");
    }

    #[test]
    fn tuples_compare_by_value() {
        let a = Value::Tuple(Rc::new(vec![Value::Int(1), Value::Str("x".into())]));
        let b = Value::Tuple(Rc::new(vec![Value::Int(1), Value::Str("x".into())]));
        assert_eq!(a, b);
    }

    #[test]
    fn null_objects_are_equal_to_each_other() {
        assert_eq!(Value::Object(None), Value::Object(None));
    }
}
