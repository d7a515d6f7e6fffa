//! `NEW`, field access, static members, and method dispatch.

use crate::error::VmError;
use crate::vm::{ExecOutcome, Vm};
use lit_core::{Frame, ObjectData, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

impl Vm {
    pub(crate) fn op_new(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let class_name = tokens[1].clone();
        let init_label = &tokens[2];

        self.load_class(&class_name)?;

        let target = self.label_line(init_label).ok_or_else(|| {
            self.fatal(
                ip_of_line,
                format!("init label: {init_label} is not found\n    {raw_line}"),
            )
        })?;

        let field_map = self.classes[&class_name].fields.clone();
        let fields: IndexMap<String, (String, Option<Value>)> = field_map
            .into_iter()
            .map(|(name, ty)| (name, (ty, None)))
            .collect();
        let obj = ObjectData::new(class_name, fields);
        let this = Value::Object(Some(Rc::new(RefCell::new(obj))));

        self.call_stack.push(self.ip);
        self.frame_stack.push(Frame::new());
        self.this = Some(this);
        self.ip = target + 1;
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_new_generic_obj(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let class_name = tokens[1].clone();
        let init_label = &tokens[2];
        let generic_args = &tokens[3..];

        self.load_class(&class_name)?;

        let class = &self.classes[&class_name];
        if class.generics.len() != generic_args.len() {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "generic argument count mismatch for {class_name}, expected {}, got {}\n    {raw_line}",
                    class.generics.len(),
                    generic_args.len()
                ),
            ));
        }

        let generic_map: IndexMap<String, String> = class
            .generics
            .iter()
            .cloned()
            .zip(generic_args.iter().cloned())
            .collect();

        let target = self.label_line(init_label).ok_or_else(|| {
            self.fatal(
                ip_of_line,
                format!("init label: {init_label} is not found\n    {raw_line}"),
            )
        })?;

        let field_map = self.classes[&class_name].fields.clone();
        let fields: IndexMap<String, (String, Option<Value>)> = field_map
            .into_iter()
            .map(|(name, ty)| {
                let real_type = generic_map.get(&ty).cloned().unwrap_or(ty);
                (name, (real_type, None))
            })
            .collect();
        let obj = ObjectData::new_generic(class_name, generic_map, fields);
        let this = Value::Object(Some(Rc::new(RefCell::new(obj))));

        self.call_stack.push(self.ip);
        self.frame_stack.push(Frame::new());
        self.this = Some(this);
        self.ip = target + 1;
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_init_field(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let field_name = &tokens[1];
        let obj_val = self.pop(ip_of_line)?;
        let new_val = self.pop(ip_of_line)?;

        let Value::Object(Some(obj_ref)) = &obj_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected object for INIT_FIELD, got {}\n    {raw_line}",
                    obj_val.type_tag()
                ),
            ));
        };

        let mut obj = obj_ref.borrow_mut();
        let Some((expected_type, current)) = obj.fields.get(field_name).cloned() else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "field: {field_name} not found in object of class {}\n    {raw_line}",
                    obj.class_name
                ),
            ));
        };

        if new_val.type_tag() != expected_type {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "field: {field_name} is {expected_type}, got {}\n    {raw_line}",
                    new_val.type_tag()
                ),
            ));
        }
        if current.is_some() {
            return Err(self.fatal(
                ip_of_line,
                format!("field: {field_name} already initialized\n    {raw_line}"),
            ));
        }

        obj.fields.insert(field_name.clone(), (expected_type, Some(new_val)));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_update_field(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let field_name = &tokens[1];
        let obj_val = self.pop(ip_of_line)?;
        let new_val = self.pop(ip_of_line)?;

        let Value::Object(Some(obj_ref)) = &obj_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected object for UPDATE_FIELD, got {}\n    {raw_line}",
                    obj_val.type_tag()
                ),
            ));
        };

        let mut obj = obj_ref.borrow_mut();
        let Some((expected_type, _)) = obj.fields.get(field_name).cloned() else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "field: {field_name} is not found in object of class {}\n    {raw_line}",
                    obj.class_name
                ),
            ));
        };

        if new_val.type_tag() != expected_type {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "field: {field_name} is {expected_type}, got {}\n    {raw_line}",
                    new_val.type_tag()
                ),
            ));
        }

        obj.fields.insert(field_name.clone(), (expected_type, Some(new_val)));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_load_field(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let field_name = &tokens[1];
        let obj_val = self.pop(ip_of_line)?;

        let Value::Object(Some(obj_ref)) = &obj_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected object for LOAD_FIELD, got {}\n    {raw_line}",
                    obj_val.type_tag()
                ),
            ));
        };

        let obj = obj_ref.borrow();
        let Some((_, value)) = obj.fields.get(field_name) else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "field: {field_name} not found in object of class {}\n    {raw_line}",
                    obj.class_name
                ),
            ));
        };
        let value = value.clone().ok_or_else(|| {
            self.fatal(
                ip_of_line,
                format!("field: {field_name} is uninitialized\n    {raw_line}"),
            )
        })?;
        drop(obj);
        self.stack.push(value);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_load_this(
        &mut self,
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let this = self.this.clone().ok_or_else(|| {
            self.fatal(
                ip_of_line,
                format!("LOAD_THIS used outside object context\n    {raw_line}"),
            )
        })?;
        self.stack.push(this);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_set_static_field(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let class_name = tokens[1].clone();
        let field_name = tokens[2].clone();
        let new_val = self.pop(ip_of_line)?;

        self.load_class(&class_name)?;
        if let Some(code) = self.ensure_static_init(&class_name)? {
            return Ok(ExecOutcome::Halt(code));
        }

        let class = self.classes.get_mut(&class_name).unwrap();
        let Some((expected_type, _)) = class.static_fields.get(&field_name).cloned() else {
            return Err(self.fatal(
                ip_of_line,
                format!("static field: {field_name} is not found\n    {raw_line}"),
            ));
        };

        if new_val.type_tag() != expected_type {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "static field: {field_name} is {expected_type}, got {}\n    {raw_line}",
                    new_val.type_tag()
                ),
            ));
        }

        class
            .static_fields
            .insert(field_name, (expected_type, Some(new_val)));
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_load_static_field(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let class_name = tokens[1].clone();
        let field_name = &tokens[2];

        self.load_class(&class_name)?;
        if let Some(code) = self.ensure_static_init(&class_name)? {
            return Ok(ExecOutcome::Halt(code));
        }

        let class = &self.classes[&class_name];
        let Some((_, value)) = class.static_fields.get(field_name) else {
            return Err(self.fatal(
                ip_of_line,
                format!("static field: {field_name} is not found\n    {raw_line}"),
            ));
        };
        let value = value.clone().ok_or_else(|| {
            self.fatal(
                ip_of_line,
                format!("static field: {field_name} is uninitialized\n    {raw_line}"),
            )
        })?;
        self.stack.push(value);
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_call_method(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let method_name = &tokens[1];
        let obj_val = self.pop(ip_of_line)?;

        let Value::Object(Some(obj_ref)) = &obj_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected object for CALL_METHOD, got {}\n    {raw_line}",
                    obj_val.type_tag()
                ),
            ));
        };
        let class_name = obj_ref.borrow().class_name.clone();

        let label = self.classes[&class_name]
            .methods
            .get(method_name)
            .cloned()
            .ok_or_else(|| {
                self.fatal(
                    ip_of_line,
                    format!("method: {method_name} is not found in class: {class_name}\n    {raw_line}"),
                )
            })?;
        let target = self
            .label_line(&label)
            .ok_or_else(|| self.fatal(ip_of_line, format!("label not found: {label}")))?;

        self.call_stack.push(self.ip);
        self.frame_stack.push(Frame::new());
        self.this = Some(obj_val);
        self.ip = target + 1;
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_call_static_method(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let class_name = tokens[1].clone();
        let method_name = &tokens[2];

        self.load_class(&class_name)?;

        let label = self.classes[&class_name]
            .static_methods
            .get(method_name)
            .cloned()
            .ok_or_else(|| {
                self.fatal(
                    ip_of_line,
                    format!("static method: {method_name} is not found\n    {raw_line}"),
                )
            })?;
        let target = self
            .label_line(&label)
            .ok_or_else(|| self.fatal(ip_of_line, format!("label not found: {label}")))?;

        self.call_stack.push(self.ip);
        self.frame_stack.push(Frame::new());
        self.ip = target + 1;
        Ok(ExecOutcome::Continue)
    }

    pub(crate) fn op_call_super_method(
        &mut self,
        tokens: &[String],
        ip_of_line: usize,
        raw_line: &str,
    ) -> Result<ExecOutcome, VmError> {
        let method_name = &tokens[1];
        let obj_val = self.pop(ip_of_line)?;

        let Value::Object(Some(obj_ref)) = &obj_val else {
            return Err(self.fatal(
                ip_of_line,
                format!(
                    "expected object for CALL_SUPER_METHOD, got {}\n    {raw_line}",
                    obj_val.type_tag()
                ),
            ));
        };
        let class_name = obj_ref.borrow().class_name.clone();

        let super_class = self.classes[&class_name].super_class.clone().ok_or_else(|| {
            self.fatal(
                ip_of_line,
                format!("class: {class_name} has no super class\n    {raw_line}"),
            )
        })?;
        self.load_class(&super_class)?;

        let label = self.classes[&super_class]
            .methods
            .get(method_name)
            .cloned()
            .ok_or_else(|| {
                self.fatal(
                    ip_of_line,
                    format!("method: {method_name} is not found in super class\n    {raw_line}"),
                )
            })?;
        let target = self
            .label_line(&label)
            .ok_or_else(|| self.fatal(ip_of_line, format!("label not found: {label}")))?;

        self.call_stack.push(self.ip);
        self.frame_stack.push(Frame::new());
        self.this = Some(obj_val);
        self.ip = target + 1;
        Ok(ExecOutcome::Continue)
    }
}
