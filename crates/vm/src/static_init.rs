//! The static-initialiser driver.
//!
//! On the first load/store of a static field or call of a static
//! method, the class is loaded, then — if it declares a `STATIC_INIT`
//! label and has not yet run it — the flag is set *before* entry (so a
//! static initialiser that transitively touches its own class's statics
//! does not recurse) and the body is interpreted in a nested
//! execute-until-`RET` loop bounded by `VmConfig::static_init_iteration_cap`.

use crate::error::VmError;
use crate::vm::{ExecOutcome, Vm};
use lit_core::Frame;

/// Returns `Ok(Some(code))` if a `HALT` fired while the initialiser ran
/// — the caller should propagate that as its own outcome immediately,
/// exactly as the original interpreter's process-wide `exit()` would
/// have terminated everything regardless of call depth.
pub fn ensure_static_init(vm: &mut Vm, class_name: &str) -> Result<Option<i32>, VmError> {
    let (needs_init, label) = {
        let class = &vm.classes[class_name];
        (
            class.static_init.is_some() && !class.static_initialized,
            class.static_init.clone(),
        )
    };

    if !needs_init {
        return Ok(None);
    }
    let label = label.expect("needs_init implies static_init is Some");

    let Some(label_line) = vm.label_line(&label) else {
        return Err(vm.fatal(
            vm.ip,
            format!("static initialiser label: {label} is not found"),
        ));
    };

    vm.classes.get_mut(class_name).unwrap().static_initialized = true;
    tracing::debug!(class = class_name, %label, "running static initialiser");

    let saved_ip = vm.ip;
    vm.call_stack.push(saved_ip);
    vm.frame_stack.push(Frame::new());
    vm.ip = label_line + 1;

    let call_depth = vm.call_stack.len();

    for _ in 0..vm.config().static_init_iteration_cap {
        match vm.execute_one()? {
            ExecOutcome::Continue => {}
            ExecOutcome::Halt(code) => return Ok(Some(code)),
        }
        if vm.call_stack.len() < call_depth {
            return Ok(None);
        }
    }

    Err(vm.fatal(
        vm.ip,
        format!(
            "static initialiser for {class_name} exceeded {} instructions without returning",
            vm.config().static_init_iteration_cap
        ),
    ))
}
