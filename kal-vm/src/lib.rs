//! Kaleido - IR interpreter
//!
//! Executes functions of a lowered `Module`. Calls to functions with a body
//! are interpreted; calls to declarations resolve to registered natives.

mod error;
mod natives;
mod frame;
mod execution;

pub use error::VmError;
pub use natives::{Native, NativeFn, NativeTable};

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use kal_frontend::ir::Module;

pub const DEFAULT_MAX_STEPS: u64 = 10_000_000;
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Instructions one top-level call may execute
    pub max_steps: u64,
    pub max_call_depth: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Cloneable in-memory sink; clones share one buffer
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer(Rc<RefCell<Vec<u8>>>);

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.borrow_mut());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// The Kaleido virtual machine
pub struct Vm {
    config: VmConfig,
    natives: NativeTable,
    output: Box<dyn Write>,
    steps: u64,
    depth: usize,
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            config,
            natives: NativeTable::with_defaults(),
            output: Box::new(io::stdout()),
            steps: 0,
            depth: 0,
        }
    }

    pub fn config(&self) -> VmConfig {
        self.config
    }

    pub fn set_output(&mut self, output: Box<dyn Write>) {
        self.output = output;
    }

    pub fn natives(&self) -> &NativeTable {
        &self.natives
    }

    pub fn register_native<F>(&mut self, name: &str, arity: usize, function: F)
    where
        F: Fn(&[f64], &mut dyn Write) -> io::Result<f64> + 'static,
    {
        self.natives.register(name, arity, function);
    }

    /// Instructions executed by the last `call`
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Run `name` with `args` to completion; the step budget restarts on
    /// every call
    pub fn call(&mut self, module: &Module, name: &str, args: &[f64]) -> Result<f64, VmError> {
        self.steps = 0;
        self.depth = 0;
        let result = self.invoke(module, name, args);
        self.output.flush()?;
        result
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
