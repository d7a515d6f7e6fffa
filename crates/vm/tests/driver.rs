//! Exercises `run_file`, the file-reading entry point `main.rs` calls.

use lit_vm::{run_file, VmConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn run_file_reads_a_program_off_disk_and_runs_it() {
    let mut file = NamedTempFile::with_suffix(".lbc").expect("create temp file");
    writeln!(
        file,
        "LABEL main\nPUSH_CONST int 5\nSTORE_VAR x\nHALT 3"
    )
    .expect("write program");

    let code = run_file(file.path(), VmConfig::new()).expect("program should run");
    assert_eq!(code, 3);
}

#[test]
fn run_file_reports_a_fatal_error_with_source_context() {
    let mut file = NamedTempFile::with_suffix(".lbc").expect("create temp file");
    writeln!(file, "LABEL main\nRET").expect("write program");

    let err = run_file(file.path(), VmConfig::new()).expect_err("RET without CALL is fatal");
    let message = err.to_string();
    assert!(message.contains("RET"), "message was: {message}");
}
