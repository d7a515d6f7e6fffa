//! Load a `.lbc` program from disk and run it to exhaustion.

use crate::config::VmConfig;
use crate::error::VmError;
use crate::vm::Vm;
use std::fs;
use std::path::Path;

/// Read `path`, split it into lines, and run it with `config`. Returns
/// the process exit code `HALT` requested, or `0` if the program falls
/// off the end without ever executing one.
pub fn run_file(path: &Path, config: VmConfig) -> Result<i32, VmError> {
    let source = fs::read_to_string(path).map_err(|e| {
        VmError::new(
            path.display().to_string(),
            0,
            "",
            format!("failed to read program: {e}"),
        )
    })?;

    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    let mut vm = Vm::new(path.display().to_string(), lines, config);

    tracing::info!(path = %path.display(), "running program");
    vm.run()
}
