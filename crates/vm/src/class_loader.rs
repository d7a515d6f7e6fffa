//! Lazy, cycle-detecting class loader.
//!
//! `load_class` materialises a class's method table, field layout,
//! static-field cells, static initialiser pointer, superclass,
//! implemented interfaces, and generic parameter names the first time
//! anything references the class by name, recursively loading
//! ancestors and interfaces first. At `END_CLASS` it merges the
//! superclass's and each interface's entries into the child.
//!
//! Merge order deliberately does not widen to "child wins": parent
//! (then interface) entries are copied into the child table
//! unconditionally, so a parent field/method of the same name
//! overwrites one the child declared earlier in its own body. See
//! DESIGN.md for why this is kept.
//!
//! A class is marked "loading" before its `EXTENDS`/`IMPLEMENTS`
//! targets are recursively loaded, so malformed cyclic input fails with
//! a diagnostic instead of recursing forever.

use crate::error::VmError;
use crate::vm::Vm;
use lit_core::{split_line, Class};

pub fn load_class(vm: &mut Vm, name: &str) -> Result<(), VmError> {
    // Checked before `classes.contains_key`: the target's `CLASS` line
    // inserts a partial entry into `vm.classes` before its own
    // `EXTENDS`/`IMPLEMENTS` targets are recursively loaded, so a
    // contains_key-first check would let a cycle resolve silently
    // against that partial entry instead of failing here.
    if vm.loading.contains(name) {
        return Err(vm.fatal(
            vm.ip,
            format!("cyclic class dependency detected while loading: {name}"),
        ));
    }
    if vm.classes.contains_key(name) {
        return Ok(());
    }

    let Some(start_index) = vm.class_position(name) else {
        return Err(vm.fatal(vm.ip, format!("class: {name} is not found")));
    };

    vm.loading.insert(name.to_string());

    let mut idx = start_index;
    let mut current_class: Option<String> = None;

    loop {
        if idx >= vm.lines.len() {
            return Err(vm.fatal(idx, format!("class {name}: missing END_CLASS")));
        }
        let raw_line = vm.lines[idx].clone();
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
            idx += 1;
            continue;
        }

        let tokens = split_line(&raw_line);
        let op = tokens[0].to_ascii_uppercase();

        match op.as_str() {
            "CLASS" => {
                let class_name = tokens[1].clone();
                vm.classes.insert(class_name.clone(), Class::new());
                current_class = Some(class_name);
            }
            "EXTENDS" => {
                let super_name = tokens[1].clone();
                load_class(vm, &super_name)?;
                let cur = current_class.clone().expect("CLASS precedes EXTENDS");
                vm.classes.get_mut(&cur).unwrap().super_class = Some(super_name);
            }
            "IMPLEMENTS" => {
                let joined = tokens[1..].join(" ");
                let interfaces: Vec<String> = joined
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();

                for iface in &interfaces {
                    load_class(vm, iface)?;
                }

                let cur = current_class.clone().expect("CLASS precedes IMPLEMENTS");
                vm.classes.get_mut(&cur).unwrap().interfaces = interfaces;
            }
            "GENERIC" => {
                let g_name = tokens[1].clone();
                let cur = current_class.clone().expect("CLASS precedes GENERIC");
                vm.classes.get_mut(&cur).unwrap().generics.push(g_name);
            }
            "FIELD" => {
                let f_type = tokens[1].clone();
                let f_name = tokens[2].clone();
                let cur = current_class.clone().expect("CLASS precedes FIELD");
                vm.classes
                    .get_mut(&cur)
                    .unwrap()
                    .fields
                    .insert(f_name, f_type);
            }
            "STATIC_FIELD" => {
                let f_type = tokens[1].clone();
                let f_name = tokens[2].clone();
                let cur = current_class.clone().expect("CLASS precedes STATIC_FIELD");
                vm.classes
                    .get_mut(&cur)
                    .unwrap()
                    .static_fields
                    .insert(f_name, (f_type, None));
            }
            "STATIC_INIT" => {
                let label = tokens[1].clone();
                let cur = current_class.clone().expect("CLASS precedes STATIC_INIT");
                let class = vm.classes.get_mut(&cur).unwrap();
                class.static_init = Some(label);
                class.static_initialized = false;
            }
            "METHOD" => {
                let m_name = tokens[1].clone();
                let m_label = tokens[2].clone();
                let cur = current_class.clone().expect("CLASS precedes METHOD");
                vm.classes
                    .get_mut(&cur)
                    .unwrap()
                    .methods
                    .insert(m_name, m_label);
            }
            "STATIC_METHOD" => {
                let m_name = tokens[1].clone();
                let m_label = tokens[2].clone();
                let cur = current_class.clone().expect("CLASS precedes STATIC_METHOD");
                vm.classes
                    .get_mut(&cur)
                    .unwrap()
                    .static_methods
                    .insert(m_name, m_label);
            }
            "END_CLASS" => {
                let cur = current_class.clone().expect("CLASS precedes END_CLASS");
                merge_inheritance(vm, &cur);
                vm.loading.remove(name);
                tracing::debug!(class = %cur, "class loaded");
                return Ok(());
            }
            other => {
                return Err(vm.fatal(idx, format!("not a class instruction: {other}")));
            }
        }

        idx += 1;
    }
}

/// Copy the superclass's (then each interface's) entries into `cur`,
/// unconditionally overwriting anything `cur` already defined with the
/// same name. This is the literal behaviour of the interpreter this was
/// distilled from.
fn merge_inheritance(vm: &mut Vm, cur: &str) {
    let super_class = vm.classes[cur].super_class.clone();

    if let Some(super_name) = super_class {
        let parent_fields = vm.classes[&super_name].fields.clone();
        let parent_methods = vm.classes[&super_name].methods.clone();
        let parent_static_fields = vm.classes[&super_name].static_fields.clone();
        let parent_static_methods = vm.classes[&super_name].static_methods.clone();

        let child = vm.classes.get_mut(cur).unwrap();
        for (name, ty) in parent_fields {
            child.fields.insert(name, ty);
        }
        for (name, label) in parent_methods {
            child.methods.insert(name, label);
        }
        for (name, (ty, _)) in parent_static_fields {
            child.static_fields.insert(name, (ty, None));
        }
        for (name, label) in parent_static_methods {
            child.static_methods.insert(name, label);
        }
    }

    let interfaces = vm.classes[cur].interfaces.clone();
    for iface in interfaces {
        let iface_methods = vm.classes[&iface].methods.clone();
        let child = vm.classes.get_mut(cur).unwrap();
        for (name, label) in iface_methods {
            child.methods.insert(name, label);
        }
    }
}
