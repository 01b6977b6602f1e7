//! Test modules for the resolver.
//!
//! Shared tree-building helpers live here; the scenario suites are split
//! by the machinery they exercise.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod ambiguity_tests;

use cxf_ast::{
    AstArena, DeclSpecKind, DeclaratorData, NameData, NodeId, NodeKind, Span, StringInterner,
    Symbol,
};

/// Allocate an identifier name node.
pub(crate) fn name(arena: &mut AstArena, interner: &StringInterner, text: &str) -> NodeId {
    let symbol = interner.intern(text);
    arena.alloc(NodeKind::Name(NameData::identifier(symbol)), Span::DUMMY)
}

/// Allocate a template-id name node with the given argument nodes.
pub(crate) fn template_id(
    arena: &mut AstArena,
    interner: &StringInterner,
    text: &str,
    arguments: Vec<NodeId>,
) -> NodeId {
    let symbol = interner.intern(text);
    let id = arena.alloc(
        NodeKind::Name(NameData::template_id(symbol, arguments)),
        Span::DUMMY,
    );
    arena.connect(id);
    id
}

/// Allocate an id-expression wrapping a fresh identifier name; returns
/// `(expr, name)`.
pub(crate) fn id_expr(
    arena: &mut AstArena,
    interner: &StringInterner,
    text: &str,
) -> (NodeId, NodeId) {
    let n = name(arena, interner, text);
    let expr = arena.alloc(NodeKind::IdExpr { name: n }, Span::DUMMY);
    arena.connect(expr);
    (expr, n)
}

/// Allocate a named-type decl-specifier; returns `(decl_spec, name)`.
pub(crate) fn named_spec(
    arena: &mut AstArena,
    interner: &StringInterner,
    text: &str,
) -> (NodeId, NodeId) {
    let n = name(arena, interner, text);
    let spec = arena.alloc(
        NodeKind::DeclSpecifier(DeclSpecKind::Named { name: n }),
        Span::DUMMY,
    );
    arena.connect(spec);
    (spec, n)
}

/// Allocate a decl-specifier wrapping an existing name node.
pub(crate) fn spec_of(arena: &mut AstArena, name: NodeId) -> NodeId {
    let spec = arena.alloc(
        NodeKind::DeclSpecifier(DeclSpecKind::Named { name }),
        Span::DUMMY,
    );
    arena.connect(spec);
    spec
}

/// Allocate a plain named declarator; returns `(declarator, name)`.
pub(crate) fn named_declarator(
    arena: &mut AstArena,
    interner: &StringInterner,
    text: &str,
) -> (NodeId, NodeId) {
    let n = name(arena, interner, text);
    let declarator = arena.alloc(
        NodeKind::Declarator(DeclaratorData::named(n)),
        Span::DUMMY,
    );
    arena.connect(declarator);
    (declarator, n)
}

pub(crate) fn symbol_of(arena: &AstArena, name: NodeId) -> Symbol {
    arena.name(name).unwrap().symbol
}
