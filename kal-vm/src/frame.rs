//! Per-call storage for temps and stack slots

use std::collections::HashMap;
use kal_common::TempId;
use kal_frontend::ir::{StackSlot, Value};
use crate::VmError;

pub(crate) struct Frame<'f> {
    pub(crate) function: &'f str,
    temps: HashMap<TempId, f64>,
    slots: HashMap<TempId, f64>,
}

impl<'f> Frame<'f> {
    pub(crate) fn new(function: &'f str) -> Self {
        Self {
            function,
            temps: HashMap::new(),
            slots: HashMap::new(),
        }
    }

    pub(crate) fn set(&mut self, temp: TempId, value: f64) {
        self.temps.insert(temp, value);
    }

    pub(crate) fn value(&self, value: Value) -> Result<f64, VmError> {
        match value {
            Value::Constant(c) => Ok(c),
            Value::Temp(temp) => self.temps.get(&temp).copied().ok_or_else(|| VmError::UndefinedTemp {
                function: self.function.to_string(),
                temp,
            }),
        }
    }

    pub(crate) fn allocate(&mut self, slot: TempId) {
        self.slots.insert(slot, 0.0);
    }

    pub(crate) fn load(&self, slot: StackSlot) -> Result<f64, VmError> {
        self.slots.get(&slot.id()).copied().ok_or_else(|| self.invalid_slot(slot))
    }

    pub(crate) fn store(&mut self, slot: StackSlot, value: f64) -> Result<(), VmError> {
        match self.slots.get_mut(&slot.id()) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(self.invalid_slot(slot)),
        }
    }

    fn invalid_slot(&self, slot: StackSlot) -> VmError {
        VmError::InvalidSlot {
            function: self.function.to_string(),
            slot: slot.id(),
        }
    }
}
