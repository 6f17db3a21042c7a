//! Native functions callable through `extern` declarations

use std::collections::HashMap;
use std::io::Write;

/// A native receives its evaluated arguments and the VM's output sink
pub type NativeFn = Box<dyn Fn(&[f64], &mut dyn Write) -> std::io::Result<f64>>;

pub struct Native {
    pub arity: usize,
    pub function: NativeFn,
}

#[derive(Default)]
pub struct NativeTable {
    natives: HashMap<String, Native>,
}

impl NativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with `putchard`, `printd`, `sin`, `cos` and `sqrt`
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.register("putchard", 1, |args, out| {
            out.write_all(&[args[0] as u8])?;
            Ok(0.0)
        });
        table.register("printd", 1, |args, out| {
            writeln!(out, "{:.6}", args[0])?;
            Ok(0.0)
        });
        table.register("sin", 1, |args, _| Ok(args[0].sin()));
        table.register("cos", 1, |args, _| Ok(args[0].cos()));
        table.register("sqrt", 1, |args, _| Ok(args[0].sqrt()));
        table
    }

    /// Register or replace a native
    pub fn register<F>(&mut self, name: &str, arity: usize, function: F)
    where
        F: Fn(&[f64], &mut dyn Write) -> std::io::Result<f64> + 'static,
    {
        self.natives.insert(name.to_string(), Native { arity, function: Box::new(function) });
    }

    pub fn get(&self, name: &str) -> Option<&Native> {
        self.natives.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.natives.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.natives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
