//! The `Class` record populated by the class loader.

use crate::value::{TypeTag, Value};
use indexmap::IndexMap;

/// Everything the class loader learns about one `CLASS ... END_CLASS`
/// body, after the `EXTENDS`/`IMPLEMENTS` inheritance merge at
/// `END_CLASS` has run.
#[derive(Debug, Default)]
pub struct Class {
    /// Declared field name -> declared type tag, in declaration order.
    pub fields: IndexMap<String, TypeTag>,
    /// Instance method name -> label.
    pub methods: IndexMap<String, String>,
    /// Static field name -> (declared type tag, current value).
    pub static_fields: IndexMap<String, (TypeTag, Option<Value>)>,
    /// Label of the `STATIC_INIT` body, if any.
    pub static_init: Option<String>,
    /// Set to `true` the moment the static initialiser is entered, not
    /// when it returns, so a static initialiser that transitively
    /// touches its own class's statics does not recurse.
    pub static_initialized: bool,
    pub static_methods: IndexMap<String, String>,
    pub super_class: Option<String>,
    /// Interface/class names from `IMPLEMENTS`, in declaration order.
    pub interfaces: Vec<String>,
    /// Generic parameter names from `GENERIC`, in declaration order.
    pub generics: Vec<String>,
}

impl Class {
    pub fn new() -> Self {
        Class::default()
    }
}
