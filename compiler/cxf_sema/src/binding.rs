//! Bindings: the resolved meaning of a name.
//!
//! A [`Binding`] is a cheap-clone handle (`Rc` internally); the identity
//! callers observe across repeated `resolve_binding` calls is pointer
//! identity, checked with [`Binding::ptr_eq`]. Unresolvable names are not
//! errors: they resolve to a problem binding that participates normally in
//! the cache.

use cxf_ast::Symbol;
use std::fmt;
use std::rc::Rc;

/// Why a name could not be resolved.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ProblemKind {
    /// No declaration found.
    NotFound,
    /// Found, but not usable as a type in this position.
    NotAType,
    /// Used with template arguments but does not name a template.
    NotATemplate,
    /// Multiple conflicting declarations.
    AmbiguousLookup,
    /// The per-name resolution depth bound was exceeded. Once cached this
    /// permanently short-circuits resolution of the name.
    RecursionOverflow,
    /// The scope collaborator failed outright.
    LookupFailure,
}

/// Semantic kind of a binding.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingKind {
    /// A concrete type (class, enum, typedef).
    Type,
    Variable,
    Function,
    ClassTemplate,
    FunctionTemplate,
    /// A template parameter; `pack` marks a parameter pack.
    TemplateParameter { pack: bool },
    /// A class-template instance whose instantiation is deferred; upgraded
    /// to [`BindingKind::Specialization`] by the second resolution phase.
    DeferredInstance,
    /// A concrete template specialization.
    Specialization,
    /// Unknown binding in a dependent context; consistent with a template.
    Dependent,
    Problem(ProblemKind),
}

/// Coarse class of a binding kind, used by the finalization invariant: a
/// final binding must stay in the class of the intermediate binding it
/// replaces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum KindClass {
    Type,
    Value,
    Function,
    Template,
    Dependent,
    Problem,
}

#[derive(Debug, Eq, PartialEq)]
struct BindingData {
    symbol: Symbol,
    kind: BindingKind,
}

/// Resolved meaning of a name.
#[derive(Clone)]
pub struct Binding(Rc<BindingData>);

impl Binding {
    /// Create a binding.
    pub fn new(symbol: Symbol, kind: BindingKind) -> Self {
        Binding(Rc::new(BindingData { symbol, kind }))
    }

    /// Create a problem binding.
    pub fn problem(symbol: Symbol, problem: ProblemKind) -> Self {
        Binding::new(symbol, BindingKind::Problem(problem))
    }

    /// The name's symbol.
    pub fn symbol(&self) -> Symbol {
        self.0.symbol
    }

    /// Semantic kind.
    pub fn kind(&self) -> &BindingKind {
        &self.0.kind
    }

    /// Returns true for problem bindings.
    pub fn is_problem(&self) -> bool {
        matches!(self.0.kind, BindingKind::Problem(_))
    }

    /// The problem kind, if this is a problem binding.
    pub fn problem_kind(&self) -> Option<ProblemKind> {
        match self.0.kind {
            BindingKind::Problem(p) => Some(p),
            _ => None,
        }
    }

    /// Returns true for bindings usable as a type.
    pub fn is_type_like(&self) -> bool {
        matches!(
            self.0.kind,
            BindingKind::Type
                | BindingKind::ClassTemplate
                | BindingKind::TemplateParameter { .. }
                | BindingKind::DeferredInstance
                | BindingKind::Specialization
                | BindingKind::Dependent
        )
    }

    /// Returns true for bindings consistent with a template name: function
    /// templates, class templates, specializations, and dependent or
    /// unknown bindings that may still instantiate.
    pub fn is_template_like(&self) -> bool {
        matches!(
            self.0.kind,
            BindingKind::ClassTemplate
                | BindingKind::FunctionTemplate
                | BindingKind::TemplateParameter { .. }
                | BindingKind::DeferredInstance
                | BindingKind::Specialization
                | BindingKind::Dependent
        )
    }

    /// Returns true if the binding has a distinct second resolution phase.
    pub fn needs_final_phase(&self) -> bool {
        matches!(self.0.kind, BindingKind::DeferredInstance)
    }

    /// Coarse kind class (see [`KindClass`]).
    pub fn kind_class(&self) -> KindClass {
        match self.0.kind {
            BindingKind::Type
            | BindingKind::TemplateParameter { .. }
            | BindingKind::DeferredInstance
            | BindingKind::Specialization => KindClass::Type,
            BindingKind::Variable => KindClass::Value,
            BindingKind::Function => KindClass::Function,
            BindingKind::ClassTemplate | BindingKind::FunctionTemplate => KindClass::Template,
            BindingKind::Dependent => KindClass::Dependent,
            BindingKind::Problem(_) => KindClass::Problem,
        }
    }

    /// Pointer identity: true if both handles refer to the same binding
    /// object.
    pub fn ptr_eq(&self, other: &Binding) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.0.symbol == other.0.symbol && self.0.kind == other.0.kind
    }
}

impl Eq for Binding {}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binding({:?}, {:?})", self.0.symbol, self.0.kind)
    }
}
