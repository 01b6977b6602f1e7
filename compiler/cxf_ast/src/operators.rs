//! Binary-operator chain.
//!
//! While a binary expression is being assembled its operators are kept as a
//! flat chain in source order instead of a tree, because an open `<` branch
//! point may later splice a template-id over part of the chain. Each
//! operator carries split left/right precedence values; the rebuild walks
//! the chain with a pending stack, reducing whenever the precedence to the
//! left is lower than the pending operator's left precedence.

use crate::arena::{AstArena, NodeId};
use crate::node::{BinaryOpKind, NodeKind};
use crate::token::TokenKind;

/// One operator in the chain, together with the operand that preceded it.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ChainEntry {
    /// Operand to the left of the operator.
    pub expr: NodeId,
    pub op: TokenKind,
    /// Source offset of the operator token.
    pub offset: u32,
    pub left_prec: u8,
    pub right_prec: u8,
}

/// Operand/operator chain in source order.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct OperatorChain {
    entries: Vec<ChainEntry>,
}

impl OperatorChain {
    /// Empty chain.
    pub fn new() -> Self {
        OperatorChain {
            entries: Vec::new(),
        }
    }

    /// Append an operator with the operand that preceded it.
    pub fn push(&mut self, expr: NodeId, op: TokenKind, offset: u32, left_prec: u8, right_prec: u8) {
        self.entries.push(ChainEntry {
            expr,
            op,
            offset,
            left_prec,
            right_prec,
        });
    }

    /// Number of operators pushed so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no operator has been pushed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop operators from `len` onward (fallback restore).
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Entries in source order.
    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    /// Mutable entries in source order.
    pub fn entries_mut(&mut self) -> &mut [ChainEntry] {
        &mut self.entries
    }

    /// Remove the entry range `[from, to)` and replace the left operand of
    /// the entry now at `from` (or the final operand slot) with `expr`.
    ///
    /// This is the template-id splice: the removed operators were the
    /// relational reading of a span the winning variant re-reads as one
    /// template-id expression.
    pub fn splice(&mut self, from: usize, to: usize, expr: NodeId, last_expr: &mut NodeId) {
        self.entries.drain(from..to);
        if let Some(entry) = self.entries.get_mut(from) {
            entry.expr = expr;
        } else {
            *last_expr = expr;
        }
    }
}

/// Split precedence for a binary operator token.
///
/// The values are ordered so that `left < right` groups left-to-right and
/// `left > right` (assignment) groups right-to-left.
pub fn precedence(op: TokenKind) -> Option<(u8, u8)> {
    let pair = match op {
        // Lowest precedence
        TokenKind::Comma => (10, 11),
        // Assignments group right to left
        TokenKind::Assign => (21, 20),
        TokenKind::PipePipe => (30, 31),
        TokenKind::AmpAmp => (40, 41),
        TokenKind::Pipe => (50, 51),
        TokenKind::Caret => (60, 61),
        TokenKind::Amp => (70, 71),
        TokenKind::EqEq | TokenKind::NotEq => (80, 81),
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => (90, 91),
        TokenKind::Shl | TokenKind::Shr => (100, 101),
        TokenKind::Plus | TokenKind::Minus => (110, 111),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => (120, 121),
        _ => return None,
    };
    Some(pair)
}

/// Rebuild the expression tree from a chain and the operand following its
/// last operator.
///
/// Walks the chain right-to-left with a pending stack: an operator is
/// reduced when the operator to its left binds less tightly, otherwise it is
/// shifted onto the pending stack, exchanging its stored operand for the
/// expression accumulated so far.
pub fn build_expression(arena: &mut AstArena, chain: &OperatorChain, last: NodeId) -> NodeId {
    let mut left: Vec<ChainEntry> = chain.entries.clone();
    let mut pending: Vec<ChainEntry> = Vec::new();
    let mut expr = last;
    loop {
        let reduce = match (left.last(), pending.last()) {
            (None, None) => return expr,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (Some(l), Some(p)) => l.right_prec < p.left_prec,
        };
        if reduce {
            if let Some(op) = pending.pop() {
                expr = make_binary(arena, expr, op);
            }
        } else if let Some(mut op) = left.pop() {
            std::mem::swap(&mut op.expr, &mut expr);
            pending.push(op);
        }
    }
}

fn make_binary(arena: &mut AstArena, left: NodeId, op: ChainEntry) -> NodeId {
    let kind = BinaryOpKind::from_token(op.op).unwrap_or(BinaryOpKind::Comma);
    let right = op.expr;
    let span = arena.get(left).span.to(arena.get(right).span);
    let node = arena.alloc(
        NodeKind::Binary {
            op: kind,
            lhs: left,
            rhs: right,
        },
        span,
    );
    arena.connect(node);
    node
}
