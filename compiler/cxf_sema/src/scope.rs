//! The lookup seam between the resolver and its host.
//!
//! The resolver never consults declarations directly; it asks a
//! [`LookupScope`] for bindings. The trait keeps the resolver independent
//! of how the host stores symbols, and lets tests substitute scopes that
//! fail on demand. [`SymbolTable`] is the built-in implementation: a flat
//! table good enough for whole-program tests and small front ends.

use crate::binding::{Binding, BindingKind, ProblemKind};
use crate::instantiate::InstantiationContext;
use cxf_ast::Symbol;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use thiserror::Error;

/// Syntactic role a name occupies, derived from its parent node. Lookup
/// interprets results differently per role.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum NameRole {
    /// Used where a type is required (decl-specifier, type-id).
    Type,
    /// Used as an expression (id-expression).
    Expression,
    /// Template name preceding an argument list.
    TemplateName,
    /// Declared name; introduces a binding rather than finding one.
    Declaration,
}

/// A single lookup request.
#[derive(Copy, Clone, Debug)]
pub struct LookupQuery {
    pub symbol: Symbol,
    pub role: NameRole,
}

/// Failure of the scope collaborator itself (not of the name).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("scope failed while looking up {0:?}")]
    ScopeFailure(Symbol),
}

/// Host-provided name lookup.
///
/// Methods take `&self`; implementations that cache use interior
/// mutability, as [`SymbolTable`] does for its member cache.
pub trait LookupScope {
    /// First-phase lookup. Unknown names are reported as problem bindings,
    /// not errors; `Err` means the scope itself failed.
    fn create_intermediate_binding(&self, query: LookupQuery) -> Result<Binding, LookupError>;

    /// Second-phase resolution of a binding produced by the first phase.
    /// The context, when present, carries the enclosing instantiation's
    /// parameter values and lookup point; the resolver hands it through
    /// untouched. The default finalization is the identity.
    fn finalize_binding(
        &self,
        intermediate: &Binding,
        context: Option<&InstantiationContext>,
    ) -> Result<Binding, LookupError> {
        let _ = context;
        Ok(intermediate.clone())
    }

    /// Warm any per-scope caches before a batch of lookups. Optional.
    fn populate_member_cache(&self) {}
}

/// Flat symbol table implementing [`LookupScope`].
#[derive(Default)]
pub struct SymbolTable {
    entries: FxHashMap<Symbol, Binding>,
    member_cache: RefCell<FxHashMap<Symbol, Binding>>,
    /// Symbol on which lookup reports a collaborator failure. Test hook.
    fail_on: Option<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn declare(&mut self, symbol: Symbol, kind: BindingKind) -> Binding {
        let binding = Binding::new(symbol, kind);
        self.entries.insert(symbol, binding.clone());
        binding
    }

    pub fn declare_type(&mut self, symbol: Symbol) -> Binding {
        self.declare(symbol, BindingKind::Type)
    }

    pub fn declare_variable(&mut self, symbol: Symbol) -> Binding {
        self.declare(symbol, BindingKind::Variable)
    }

    pub fn declare_function(&mut self, symbol: Symbol) -> Binding {
        self.declare(symbol, BindingKind::Function)
    }

    pub fn declare_class_template(&mut self, symbol: Symbol) -> Binding {
        self.declare(symbol, BindingKind::ClassTemplate)
    }

    pub fn declare_function_template(&mut self, symbol: Symbol) -> Binding {
        self.declare(symbol, BindingKind::FunctionTemplate)
    }

    pub fn declare_template_parameter(&mut self, symbol: Symbol, pack: bool) -> Binding {
        self.declare(symbol, BindingKind::TemplateParameter { pack })
    }

    /// Make every lookup of `symbol` fail with a [`LookupError`].
    pub fn fail_on(&mut self, symbol: Symbol) {
        self.fail_on = Some(symbol);
    }

    fn find(&self, symbol: Symbol) -> Option<Binding> {
        if let Some(b) = self.member_cache.borrow().get(&symbol) {
            return Some(b.clone());
        }
        self.entries.get(&symbol).cloned()
    }
}

impl LookupScope for SymbolTable {
    fn create_intermediate_binding(&self, query: LookupQuery) -> Result<Binding, LookupError> {
        if self.fail_on == Some(query.symbol) {
            return Err(LookupError::ScopeFailure(query.symbol));
        }
        let found = self.find(query.symbol);
        let binding = match (query.role, found) {
            // Declared names introduce a binding if none exists.
            (NameRole::Declaration, Some(b)) => b,
            (NameRole::Declaration, None) => {
                Binding::new(query.symbol, BindingKind::Variable)
            }
            (NameRole::Type, Some(b)) if b.is_type_like() => b,
            (NameRole::Type, Some(_)) => Binding::problem(query.symbol, ProblemKind::NotAType),
            (NameRole::Expression | NameRole::TemplateName, Some(b)) => b,
            (_, None) => Binding::problem(query.symbol, ProblemKind::NotFound),
        };
        Ok(binding)
    }

    fn finalize_binding(
        &self,
        intermediate: &Binding,
        _context: Option<&InstantiationContext>,
    ) -> Result<Binding, LookupError> {
        // Deferred instances become concrete specializations; everything
        // else finalizes to itself.
        if intermediate.needs_final_phase() {
            Ok(Binding::new(
                intermediate.symbol(),
                BindingKind::Specialization,
            ))
        } else {
            Ok(intermediate.clone())
        }
    }

    fn populate_member_cache(&self) {
        let mut cache = self.member_cache.borrow_mut();
        if cache.is_empty() {
            for (sym, binding) in &self.entries {
                cache.insert(*sym, binding.clone());
            }
        }
    }
}
