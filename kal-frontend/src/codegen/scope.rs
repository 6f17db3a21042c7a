//! Variable scoping for the lowering engine
//!
//! A single flat map from variable name to stack slot. Nested binding
//! constructs shadow a name by rebinding it and recording the previous
//! slot in a `Shadowed` set; restoring the set puts every earlier binding
//! (or its absence) back.

use std::collections::HashMap;
use crate::ir::StackSlot;

#[derive(Debug, Default)]
pub struct ScopeStack {
    bindings: HashMap<String, StackSlot>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the slot it shadows
    pub fn bind(&mut self, name: &str, slot: StackSlot) -> Option<StackSlot> {
        self.bindings.insert(name.to_string(), slot)
    }

    pub fn lookup(&self, name: &str) -> Option<StackSlot> {
        self.bindings.get(name).copied()
    }

    /// Undo one `bind`: rebind the previous slot, or remove the name
    pub fn restore(&mut self, name: &str, previous: Option<StackSlot>) {
        match previous {
            Some(slot) => {
                self.bindings.insert(name.to_string(), slot);
            }
            None => {
                self.bindings.remove(name);
            }
        }
    }

    /// Undo a whole construct's bindings, newest first
    pub fn restore_all(&mut self, shadowed: Shadowed) {
        for (name, previous) in shadowed.entries.into_iter().rev() {
            self.restore(&name, previous);
        }
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Bindings made by one construct, in bind order, with what each replaced
#[derive(Debug, Default)]
pub struct Shadowed {
    entries: Vec<(String, Option<StackSlot>)>,
}

impl Shadowed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind through `scopes` and remember what to restore
    pub fn bind(&mut self, scopes: &mut ScopeStack, name: &str, slot: StackSlot) {
        let previous = scopes.bind(name, slot);
        self.entries.push((name.to_string(), previous));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
