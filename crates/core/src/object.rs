//! Heap-allocated object and array records.
//!
//! Both are `Rc<RefCell<_>>` handles so that every `Value` that names the
//! same object or array observes the same mutations — matching the
//! shared-reference semantics required by `INIT_FIELD`/`UPDATE_FIELD`
//! and `ARRAY_SET`. Neither type attempts cycle collection: the stated
//! non-goal of garbage collection means a reference cycle between two
//! objects simply leaks, same as the host runtime this was distilled
//! from.

use crate::value::{TypeTag, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

pub type ObjectRef = Rc<RefCell<ObjectData>>;
pub type ArrayRef = Rc<RefCell<ArrayData>>;

/// A heap object: the class it was constructed from, an optional
/// generic-parameter-name -> concrete-type map (only present for
/// `NEW_GENERIC_OBJ` instances), and its field slots. A field slot's
/// value is `None` until `INIT_FIELD` writes it the first time.
#[derive(Debug)]
pub struct ObjectData {
    pub class_name: String,
    pub generic_map: Option<IndexMap<String, String>>,
    pub fields: IndexMap<String, (TypeTag, Option<Value>)>,
}

impl ObjectData {
    pub fn new(class_name: String, fields: IndexMap<String, (TypeTag, Option<Value>)>) -> Self {
        ObjectData {
            class_name,
            generic_map: None,
            fields,
        }
    }

    pub fn new_generic(
        class_name: String,
        generic_map: IndexMap<String, String>,
        fields: IndexMap<String, (TypeTag, Option<Value>)>,
    ) -> Self {
        ObjectData {
            class_name,
            generic_map: Some(generic_map),
            fields,
        }
    }
}

/// A heap array: the element type tag it was constructed with, and a
/// mutable sequence of slots. A slot is `None` until written, exactly
/// like an object field, which is how `NEW_ARRAY`/`INIT_ARRAY` leave
/// trailing/omitted slots.
#[derive(Debug)]
pub struct ArrayData {
    pub elem_type: TypeTag,
    pub data: Vec<Option<Value>>,
}

impl ArrayData {
    pub fn new(elem_type: TypeTag, len: usize) -> Self {
        ArrayData {
            elem_type,
            data: vec![None; len],
        }
    }
}
