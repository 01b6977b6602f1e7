//! AST substrate for the cxf C++ frontend.
//!
//! Flat arena nodes using `AstArena`/`NodeId` indices. This crate carries the
//! syntactic side of disambiguation: the node catalogue (including the
//! ambiguity node kinds), the binary-operator chain used while an expression
//! is still being assembled, and the branch-point/variant bookkeeping for
//! `<` tokens that may open a template-argument list. Semantic resolution of
//! all of these lives in `cxf_sema`.

mod angle;
mod arena;
mod interner;
mod node;
mod operators;
mod span;
mod token;
mod visit;

pub use angle::{BranchPoint, ChainTarget, Fallback, Variant, VariantSet};
pub use arena::{AstArena, Node, NodeId};
pub use interner::{StringInterner, Symbol};
pub use node::{
    AmbiguityData, AmbiguityKind, AngleAmbiguityData, BinaryOpKind, BuiltinSpec, DeclSpecKind,
    DeclaratorData, DeclaratorKind, FunctionDeclaratorData, NameData, NameKind, NodeKind,
    PointerOp,
};
pub use operators::{build_expression, precedence, ChainEntry, OperatorChain};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use visit::{collect_names, preorder};
