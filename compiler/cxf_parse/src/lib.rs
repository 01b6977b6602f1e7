//! Expression parsing for the `cxf` front end.
//!
//! The parser here covers the part of the grammar where C++ syntax alone
//! cannot decide the shape of the tree: a `<` after a name may open a
//! template-argument list or be the less-than operator. A fast token scan
//! ([`template_argument_hint`]) settles the easy cases; genuinely ambiguous
//! ones are carried forward as `TemplateIdAmbiguity` nodes for the resolver
//! to commit once name bindings are known.

mod cursor;
mod expr;
mod scan;

pub use cursor::{Cursor, Mark};
pub use expr::Parser;
pub use scan::{template_argument_hint, AngleHint};

use cxf_ast::{AstArena, NodeId};

/// Parse failure, reported with the byte offset of the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {what} at offset {offset}")]
    Expected { what: &'static str, offset: u32 },
    #[error("unexpected token at offset {offset}")]
    UnexpectedToken { offset: u32 },
}

/// A parsed expression together with the arena that owns its nodes.
pub struct ParsedExpression {
    pub arena: AstArena,
    pub root: NodeId,
}

#[cfg(test)]
mod tests;
