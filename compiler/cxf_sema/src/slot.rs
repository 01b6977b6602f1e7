//! Per-name resolution cache.
//!
//! Resolution state lives in a side table keyed by the name's [`NodeId`]
//! rather than in the AST itself, so the arena stays plain data and the
//! resolver owns all mutation of semantic state.

use crate::binding::Binding;
use crate::resolution::Resolution;
use cxf_ast::NodeId;
use rustc_hash::FxHashMap;

/// Cache slot for one name node.
#[derive(Clone, Default, Debug)]
pub struct NameSlot {
    resolution: Resolution,
    /// Count of resolution attempts since the last successful external
    /// `set`. Deliberately not reset by [`NameSlot::clear`]: a clear that
    /// is part of a re-resolution loop must keep consuming the bound.
    depth: u32,
    /// True while a resolution of this very name is on the call stack.
    in_progress: bool,
}

impl NameSlot {
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    pub fn resolution_mut(&mut self) -> &mut Resolution {
        &mut self.resolution
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn bump_depth(&mut self) -> u32 {
        self.depth += 1;
        self.depth
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn set_in_progress(&mut self, v: bool) {
        self.in_progress = v;
    }

    /// Drop the cached resolution. The attempt counter survives.
    pub fn clear(&mut self) {
        self.resolution = Resolution::Unresolved;
    }

    /// Externally install a final binding. This is a fresh start for the
    /// name: the attempt counter resets.
    pub fn set(&mut self, binding: Binding) {
        self.resolution = Resolution::Final(binding);
        self.depth = 0;
        self.in_progress = false;
    }
}

/// Side table mapping name nodes to their resolution slots.
#[derive(Clone, Default, Debug)]
pub struct BindingTable {
    slots: FxHashMap<NodeId, NameSlot>,
}

impl BindingTable {
    pub fn new() -> Self {
        BindingTable::default()
    }

    pub fn slot(&self, name: NodeId) -> Option<&NameSlot> {
        self.slots.get(&name)
    }

    pub fn slot_mut(&mut self, name: NodeId) -> &mut NameSlot {
        self.slots.entry(name).or_default()
    }

    /// The cached binding for `name`, if any phase of resolution ran.
    pub fn binding(&self, name: NodeId) -> Option<&Binding> {
        self.slots.get(&name).and_then(|s| s.resolution().binding())
    }

    /// Drop the cached resolution for `name`, keeping its attempt counter.
    pub fn clear(&mut self, name: NodeId) {
        if let Some(slot) = self.slots.get_mut(&name) {
            slot.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingKind;
    use cxf_ast::Symbol;

    #[test]
    fn test_clear_keeps_depth_set_resets_it() {
        let mut table = BindingTable::new();
        let name = NodeId::from_raw(0);

        let slot = table.slot_mut(name);
        slot.bump_depth();
        slot.bump_depth();
        slot.clear();
        assert_eq!(slot.depth(), 2);
        assert!(slot.resolution().is_unresolved());

        slot.set(Binding::new(Symbol::from_raw(1), BindingKind::Type));
        assert_eq!(slot.depth(), 0);
        assert!(slot.resolution().is_final());
    }
}
