//! Lit Core: the tagged value model and bytecode lexeme splitter
//!
//! This crate provides the language-agnostic data model shared by every
//! stage of the Lit VM: the tagged `Value` union, the heap-allocated
//! `Object`/`Array` handles behind it, the `Class` record produced by the
//! class loader, and the per-activation `Frame`. It also hosts the
//! lexeme splitter, since tokenising one bytecode line has no dependency
//! on control flow or dispatch.
//!
//! # Modules
//!
//! - `value`: the `Value` tagged union and its runtime type tag
//! - `object`: heap object records with shared-reference semantics
//! - `class`: the class record populated by the class loader
//! - `frame`: per-activation local variable bindings
//! - `lexer`: shell-style lexeme splitting for one bytecode line

pub mod class;
pub mod frame;
pub mod lexer;
pub mod object;
pub mod value;

pub use class::Class;
pub use frame::Frame;
pub use lexer::{is_comment_or_blank, split_line};
pub use object::{ArrayData, ArrayRef, ObjectData, ObjectRef};
pub use value::{
    TypeTag, Value, TAG_ARRAY, TAG_BOOL, TAG_FLOAT, TAG_INT, TAG_LAMBDA, TAG_OBJECT, TAG_STR,
    TAG_TUPLE,
};
