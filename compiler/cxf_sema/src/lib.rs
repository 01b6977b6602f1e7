//! Semantic disambiguation for the cxf C++ frontend.
//!
//! The parser in `cxf_parse` leaves ambiguity nodes in the tree wherever
//! syntax alone cannot decide between readings; this crate resolves them.
//! [`Resolver`] drives a two-phase, memoized name resolution against a
//! host-provided [`LookupScope`], guards it with a per-name recursion
//! bound, and commits each ambiguity by trialing its alternatives and
//! splicing the winner into the parent's child slot.
//! [`TemplateParameterMap`] and [`InstantiationContext`] carry the argument
//! bindings of deferred template instances.

mod binding;
mod config;
mod error;
mod instantiate;
mod resolution;
mod resolver;
mod scope;
mod slot;

pub use binding::{Binding, BindingKind, KindClass, ProblemKind};
pub use config::ResolverConfig;
pub use error::ResolutionError;
pub use instantiate::{
    InstantiationContext, ParameterValue, TemplateArgument, TemplateParameterKey,
    TemplateParameterMap,
};
pub use resolution::Resolution;
pub use resolver::Resolver;
pub use scope::{LookupError, LookupQuery, LookupScope, NameRole, SymbolTable};
pub use slot::{BindingTable, NameSlot};

#[cfg(test)]
mod tests;
