//! Runtime configuration.
//!
//! A plain builder struct threaded from the CLI into the `Vm`, mirroring
//! how this workspace's compiler stages thread a config struct through
//! their entry points: no configuration-file format, since there's no
//! surface beyond CLI flags to configure.

#[derive(Debug, Clone)]
pub struct VmConfig {
    /// Upper bound on instructions interpreted while running a single
    /// static initialiser, guarding against a body that never reaches
    /// its outermost `RET`. Fixed at 1000.
    pub static_init_iteration_cap: usize,
    /// Where fatal diagnostics (`VmError`) are written. The Python
    /// original printed everything to stdout; this implementation
    /// defaults to stderr, matching this workspace's CLI convention of
    /// `eprintln!` on error. Kept configurable so embedders can restore
    /// the original's stdout behaviour if they rely on it.
    pub diagnostics_to_stderr: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            static_init_iteration_cap: 1000,
            diagnostics_to_stderr: true,
        }
    }
}

impl VmConfig {
    pub fn new() -> Self {
        VmConfig::default()
    }

    pub fn with_static_init_iteration_cap(mut self, cap: usize) -> Self {
        self.static_init_iteration_cap = cap;
        self
    }

    pub fn with_diagnostics_to_stdout(mut self) -> Self {
        self.diagnostics_to_stderr = false;
        self
    }
}
