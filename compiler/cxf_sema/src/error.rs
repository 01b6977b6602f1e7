//! Resolver errors.
//!
//! Most failures in this crate are not errors: unresolvable names become
//! problem bindings and stay on the happy path. `ResolutionError` is for
//! conditions that violate the resolver's own contracts.

use crate::binding::KindClass;
use crate::scope::LookupError;
use cxf_ast::{NodeId, Symbol};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The scope collaborator failed. During an alternative trial this
    /// fails the alternative; outside trials it degrades to a
    /// lookup-failure problem binding.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A final binding tried to change the kind class established by the
    /// intermediate phase.
    #[error("final binding for {symbol:?} changes kind class from {from:?} to {to:?}")]
    KindMismatch {
        symbol: Symbol,
        from: KindClass,
        to: KindClass,
    },

    /// An external `set_binding` targeted a name that was frozen after the
    /// resolution pass completed.
    #[error("cannot rebind frozen name node {node:?}")]
    FrozenName { node: NodeId },

    /// The per-name recursion bound was exceeded while strict mode is on.
    #[error("resolution depth bound exceeded for {symbol:?}")]
    RecursionOverflow { symbol: Symbol },

    /// An ambiguity node has no parent to splice the winner into.
    #[error("ambiguity node {node:?} is not attached to a parent")]
    DetachedAmbiguity { node: NodeId },

    /// A node had a shape the current operation cannot work with.
    #[error("unexpected node {node:?}, expected {expected}")]
    UnexpectedNode { node: NodeId, expected: &'static str },

    /// A template parameter pack was re-bound with a different arity.
    #[error("parameter pack arity changed from {fixed} to {offered}")]
    PackArityChanged { fixed: usize, offered: usize },
}
