//! Node kind catalogue.
//!
//! The catalogue is deliberately narrow: it carries the handful of node
//! shapes the disambiguation core needs (names, the expression subset the
//! operator chain produces, the declaration shapes the ambiguity kinds
//! wrap), not the full C++ grammar.

use crate::angle::BranchPoint;
use crate::arena::NodeId;
use crate::interner::Symbol;
use crate::operators::OperatorChain;
use crate::token::TokenKind;

/// What a name syntactically is.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum NameKind {
    /// Plain identifier.
    Identifier,
    /// `operator@` function name.
    OperatorFunctionId,
    /// Template-id: the name's own symbol is the template name, the
    /// arguments are type-ids, expressions, or template-argument ambiguity
    /// nodes.
    TemplateId { arguments: Vec<NodeId> },
}

/// A name node: identifier, operator-name, or template-id.
///
/// The resolved binding is not stored here; `cxf_sema` keeps a per-name
/// memoization slot keyed by the node id. `frozen` is set once the name is
/// attached into a committed, non-ambiguous tree; after that its binding
/// must not change identity except through the two-phase upgrade.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct NameData {
    pub symbol: Symbol,
    pub kind: NameKind,
    pub frozen: bool,
}

impl NameData {
    /// Plain identifier name.
    pub fn identifier(symbol: Symbol) -> Self {
        NameData {
            symbol,
            kind: NameKind::Identifier,
            frozen: false,
        }
    }

    /// Template-id name.
    pub fn template_id(symbol: Symbol, arguments: Vec<NodeId>) -> Self {
        NameData {
            symbol,
            kind: NameKind::TemplateId { arguments },
            frozen: false,
        }
    }
}

/// Binary operator kinds produced by the operator-chain rebuild.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOpKind {
    Assign,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessEqual,
    GreaterEqual,
    ShiftLeft,
    ShiftRight,
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Comma,
}

impl BinaryOpKind {
    /// Map an operator token to its expression operator.
    ///
    /// Returns `None` for tokens that are not binary operators in the
    /// supported subset.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Assign => Some(BinaryOpKind::Assign),
            TokenKind::PipePipe => Some(BinaryOpKind::LogicalOr),
            TokenKind::AmpAmp => Some(BinaryOpKind::LogicalAnd),
            TokenKind::Pipe => Some(BinaryOpKind::BitOr),
            TokenKind::Caret => Some(BinaryOpKind::BitXor),
            TokenKind::Amp => Some(BinaryOpKind::BitAnd),
            TokenKind::EqEq => Some(BinaryOpKind::Equals),
            TokenKind::NotEq => Some(BinaryOpKind::NotEquals),
            TokenKind::Lt => Some(BinaryOpKind::LessThan),
            TokenKind::Gt => Some(BinaryOpKind::GreaterThan),
            TokenKind::LtEq => Some(BinaryOpKind::LessEqual),
            TokenKind::GtEq => Some(BinaryOpKind::GreaterEqual),
            TokenKind::Shl => Some(BinaryOpKind::ShiftLeft),
            TokenKind::Shr => Some(BinaryOpKind::ShiftRight),
            TokenKind::Plus => Some(BinaryOpKind::Plus),
            TokenKind::Minus => Some(BinaryOpKind::Minus),
            TokenKind::Star => Some(BinaryOpKind::Multiply),
            TokenKind::Slash => Some(BinaryOpKind::Divide),
            TokenKind::Percent => Some(BinaryOpKind::Modulo),
            TokenKind::Comma => Some(BinaryOpKind::Comma),
            _ => None,
        }
    }
}

/// Builtin type specifiers (narrow subset).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BuiltinSpec {
    Void,
    Int,
    Double,
}

/// Declaration-specifier payload.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum DeclSpecKind {
    /// A named type: the node id of a `Name`.
    Named { name: NodeId },
    /// A builtin type.
    Builtin(BuiltinSpec),
    /// A class definition used as a specifier.
    Class { class: NodeId },
    /// No specifier at all (constructor declarations).
    Unspecified,
}

/// A pointer operator on a declarator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum PointerOp {
    Pointer,
    Reference,
}

/// Function-declarator payload: parameter declarations plus the C-style
/// vararg flag the parameter-pack ambiguity may switch on.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FunctionDeclaratorData {
    pub parameters: Vec<NodeId>,
    pub takes_var_args: bool,
}

/// Declarator shape.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum DeclaratorKind {
    Plain,
    Function(FunctionDeclaratorData),
    /// Parenthesized declarator.
    Nested { inner: NodeId },
}

/// A declarator.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DeclaratorData {
    /// Declared name; `None` for abstract declarators.
    pub name: Option<NodeId>,
    pub pointer_ops: Vec<PointerOp>,
    pub kind: DeclaratorKind,
    pub initializer: Option<NodeId>,
    /// True while the declarator is understood to declare a parameter pack.
    pub declares_pack: bool,
}

impl DeclaratorData {
    /// Plain named declarator with no pointer operators.
    pub fn named(name: NodeId) -> Self {
        DeclaratorData {
            name: Some(name),
            pointer_ops: Vec::new(),
            kind: DeclaratorKind::Plain,
            initializer: None,
            declares_pack: false,
        }
    }

    /// Abstract declarator (no name).
    pub fn abstract_declarator() -> Self {
        DeclaratorData {
            name: None,
            pointer_ops: Vec::new(),
            kind: DeclaratorKind::Plain,
            initializer: None,
            declares_pack: false,
        }
    }
}

/// Which concrete disambiguation policy an ambiguity node uses.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AmbiguityKind {
    /// `T (D)`: cast-of-declarator vs. parenthesized declarator. The
    /// last-added alternative is preferred; a shared initializer satellite
    /// is attached to the winner.
    Declarator,
    /// `T ...`: pack declaration vs. parameter before a C-style ellipsis.
    /// Exactly one alternative; the decision is made from type information
    /// after resolving it.
    ParameterPack,
    /// `C(D);`: constructor vs. field declaration. Failure of the primary
    /// alternative repairs the declaration in place with this pair.
    SimpleDeclaration {
        repair_decl_spec: NodeId,
        repair_declarator: NodeId,
    },
    /// Template argument: type-id vs. expression. The listed names are
    /// physically shared between the alternatives and their cached bindings
    /// must be cleared before each trial.
    TemplateArgument { shared_names: Vec<NodeId> },
    /// Statement: declaration vs. expression.
    Statement,
}

/// An unresolved ambiguity: N alternative subtrees for one source span.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AmbiguityData {
    pub kind: AmbiguityKind,
    /// Alternatives in the order the parser added them (at least one).
    pub alternatives: Vec<NodeId>,
    /// Satellite fragment parsed once and owned by whichever alternative
    /// wins (e.g. an initializer).
    pub satellite: Option<NodeId>,
    /// Pointer operators parsed once after the ambiguous span, appended to
    /// the winning declarator.
    pub satellite_pointer_ops: Vec<PointerOp>,
}

/// The angle-bracket (`<` vs. template-id) ambiguity: the operator chain of
/// the relational reading plus the open branch points discovered while it
/// was assembled.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AngleAmbiguityData {
    /// Branch points ordered outer-to-inner (by source offset).
    pub branch_points: Vec<BranchPoint>,
    /// The relational reading: operand/operator chain in source order.
    pub chain: OperatorChain,
    /// Operand following the last operator.
    pub last_expr: NodeId,
}

/// Node kind.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum NodeKind {
    TranslationUnit { declarations: Vec<NodeId> },

    // Names
    Name(NameData),

    // Expressions
    IdExpr { name: NodeId },
    Literal { value: i64 },
    Binary { op: BinaryOpKind, lhs: NodeId, rhs: NodeId },
    Call { callee: NodeId, arguments: Vec<NodeId> },

    // Declarations
    SimpleDeclaration { decl_spec: NodeId, declarators: Vec<NodeId> },
    DeclSpecifier(DeclSpecKind),
    Declarator(DeclaratorData),
    ParameterDeclaration { decl_spec: NodeId, declarator: NodeId },
    TypeId { decl_spec: NodeId, declarator: Option<NodeId> },
    EqualsInitializer { expr: NodeId },
    ClassSpecifier { name: NodeId, members: Vec<NodeId> },

    // Statements
    DeclarationStatement { declaration: NodeId },
    ExpressionStatement { expr: NodeId },
    CompoundStatement { statements: Vec<NodeId> },

    // Ambiguities
    Ambiguity(AmbiguityData),
    TemplateIdAmbiguity(AngleAmbiguityData),
}
