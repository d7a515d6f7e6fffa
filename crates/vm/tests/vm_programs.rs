//! End-to-end tests driving whole `.lbc` programs through the `Vm`.
//!
//! These exercise the interpreter the way a compiled Lit program would
//! see it: a full instruction stream, run from `main` to `HALT` or
//! fall-through, with no file I/O involved.

use lit_vm::config::VmConfig;
use lit_vm::vm::Vm;

fn run(src: &str) -> (Vm, i32) {
    let lines: Vec<String> = src.lines().map(str::to_string).collect();
    let mut vm = Vm::new("test.lbc", lines, VmConfig::new());
    let code = vm.run().expect("program should run without a fatal error");
    (vm, code)
}

fn run_err(src: &str) -> String {
    let lines: Vec<String> = src.lines().map(str::to_string).collect();
    let mut vm = Vm::new("test.lbc", lines, VmConfig::new());
    vm.run().expect_err("program should fail").to_string()
}

#[test]
fn hello_prints_a_string_constant() {
    let (_, code) = run(
        "LABEL main\n\
         PUSH_CONST str \"Hello, world!\"\n\
         PRINT\n\
         HALT 0",
    );
    assert_eq!(code, 0);
}

#[test]
fn cyclic_extends_is_rejected_instead_of_overflowing_the_stack() {
    let message = run_err(
        "LABEL main\n\
         LOAD_STATIC_FIELD A x\n\
         HALT 0\n\
         CLASS A\n\
         EXTENDS B\n\
         STATIC_FIELD int x\n\
         END_CLASS\n\
         CLASS B\n\
         EXTENDS A\n\
         END_CLASS",
    );
    assert!(message.contains("cyclic"), "message was: {message}");
}

#[test]
fn arithmetic_promotion_widens_int_plus_float_to_float() {
    let (vm, code) = run(
        "LABEL main\n\
         PUSH_CONST int 2\n\
         PUSH_CONST float 3.5\n\
         ADD\n\
         STORE_VAR total\n\
         HALT 0",
    );
    assert_eq!(code, 0);
    assert_eq!(
        vm.current_frame().get("total").unwrap().display_payload(),
        "5.5"
    );
}

#[test]
fn bad_type_arithmetic_is_fatal() {
    let message = run_err(
        "LABEL main\n\
         PUSH_CONST str hello\n\
         PUSH_CONST int 1\n\
         ADD\n\
         HALT 0",
    );
    assert!(message.contains("type error"), "message was: {message}");
}

#[test]
fn division_by_zero_is_fatal_not_a_panic() {
    let message = run_err(
        "LABEL main\n\
         PUSH_CONST int 1\n\
         PUSH_CONST int 0\n\
         DIV\n\
         HALT 0",
    );
    assert!(message.contains("division by zero"), "message was: {message}");
}

#[test]
fn tuple_round_trip_through_new_get_and_unpack() {
    let (mut vm, code) = {
        let lines: Vec<String> = "LABEL main\n\
             PUSH_CONST int 1\n\
             PUSH_CONST str a\n\
             NEW_TUPLE 2\n\
             TUPLE_GET 1\n\
             STORE_VAR second\n\
             HALT 0"
            .lines()
            .map(str::to_string)
            .collect();
        let mut vm = Vm::new("test.lbc", lines, VmConfig::new());
        let code = vm.run().unwrap();
        (vm, code)
    };
    assert_eq!(code, 0);
    assert_eq!(
        vm.current_frame().get("second").unwrap().display_payload(),
        "a"
    );
}

#[test]
fn halt_short_circuits_before_the_program_falls_off_the_end() {
    let (_, code) = run(
        "LABEL main\n\
         HALT 7\n\
         PUSH_CONST int 999\n\
         PRINT",
    );
    assert_eq!(code, 7);
}

#[test]
fn try_throw_catch_resumes_at_the_handler_with_the_saved_frame() {
    let (vm, code) = run(
        "LABEL main\n\
         PUSH_CONST int 1\n\
         STORE_VAR before\n\
         TRY MyError handler\n\
         CALL thrower\n\
         JUMP done\n\
         LABEL handler\n\
         PUSH_CONST int 42\n\
         STORE_VAR caught\n\
         LABEL done\n\
         HALT 0\n\
         CLASS MyError\n\
         FIELD str description\n\
         END_CLASS\n\
         LABEL thrower\n\
         NEW MyError init_my_error\n\
         RET\n\
         LABEL init_my_error\n\
         PUSH_CONST str boom\n\
         LOAD_THIS\n\
         INIT_FIELD description\n\
         LOAD_THIS\n\
         THROW",
    );
    assert_eq!(code, 0);
    assert_eq!(
        vm.current_frame()
            .get("before")
            .unwrap()
            .display_payload(),
        "1"
    );
    assert_eq!(
        vm.current_frame()
            .get("caught")
            .unwrap()
            .display_payload(),
        "42"
    );
}

#[test]
fn static_init_runs_exactly_once_across_repeated_loads() {
    let (vm, code) = run(
        "LABEL main\n\
         LOAD_STATIC_FIELD Counter hits\n\
         STORE_VAR first\n\
         LOAD_STATIC_FIELD Counter hits\n\
         STORE_VAR second\n\
         HALT 0\n\
         CLASS Counter\n\
         STATIC_FIELD int hits\n\
         STATIC_INIT bump\n\
         END_CLASS\n\
         LABEL bump\n\
         PUSH_CONST int 1\n\
         SET_STATIC_FIELD Counter hits\n\
         RET",
    );
    assert_eq!(code, 0);
    assert_eq!(
        vm.current_frame().get("first").unwrap().display_payload(),
        "1"
    );
    assert_eq!(
        vm.current_frame().get("second").unwrap().display_payload(),
        "1"
    );
}
