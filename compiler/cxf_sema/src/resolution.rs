//! The two-phase resolution state of a single name.

use crate::binding::Binding;

/// Per-name resolution state. Moves monotonically from `Unresolved` through
/// at most one `Intermediate` stage to `Final`; it never moves backwards
/// except by an explicit cache clear, which returns it to `Unresolved`.
#[derive(Clone, Debug, Default)]
pub enum Resolution {
    /// No resolution attempted since the last clear.
    #[default]
    Unresolved,
    /// First-phase result; name lookup is done but instantiation of the
    /// binding may still be pending.
    Intermediate(Binding),
    /// Fully resolved.
    Final(Binding),
}

impl Resolution {
    /// The cached binding, at whatever phase it is in.
    pub fn binding(&self) -> Option<&Binding> {
        match self {
            Resolution::Unresolved => None,
            Resolution::Intermediate(b) | Resolution::Final(b) => Some(b),
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Resolution::Unresolved)
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Resolution::Final(_))
    }

    /// Store an intermediate binding. If the binding has no second phase it
    /// is sealed as final immediately.
    pub fn set_intermediate(&mut self, binding: Binding) {
        if binding.needs_final_phase() {
            *self = Resolution::Intermediate(binding);
        } else {
            *self = Resolution::Final(binding);
        }
    }

    /// Seal the final binding.
    pub fn seal(&mut self, binding: Binding) {
        *self = Resolution::Final(binding);
    }
}
