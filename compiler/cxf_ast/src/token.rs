//! Token boundary between the external lexer and this core.
//!
//! The preprocessor/lexer is an external collaborator; this crate only
//! defines the token shape the disambiguation machinery consumes. The kinds
//! cover the operator set the binary-expression loop dispatches on plus the
//! brackets the template-argument fast scan must balance.

use crate::interner::Symbol;
use crate::span::Span;

/// Token kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    Ident(Symbol),
    IntLit(i64),

    // Relational / shift. `Shr` may be split into two `>` while closing
    // nested template-argument lists.
    Lt,
    Gt,
    LtEq,
    GtEq,
    Shl,
    Shr,

    // Additive / multiplicative
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Bitwise / logical
    Amp,
    Pipe,
    Caret,
    AmpAmp,
    PipePipe,

    // Equality / assignment
    EqEq,
    NotEq,
    Assign,

    // Punctuation
    ColonColon,
    Comma,
    Semi,
    Ellipsis,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    Eof,
}

impl TokenKind {
    /// Returns true for tokens that can never continue an expression.
    pub fn ends_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Semi
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Eof
        )
    }
}

/// A single token with its source location.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: u32,
    pub len: u32,
}

impl Token {
    /// Create a new token.
    pub const fn new(kind: TokenKind, offset: u32, len: u32) -> Self {
        Token { kind, offset, len }
    }

    /// Offset of the first byte after the token.
    #[inline]
    pub const fn end_offset(&self) -> u32 {
        self.offset + self.len
    }

    /// Source span of the token.
    #[inline]
    pub const fn span(&self) -> Span {
        Span::new(self.offset, self.offset + self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_span() {
        let t = Token::new(TokenKind::Lt, 4, 1);
        assert_eq!(t.end_offset(), 5);
        assert_eq!(t.span(), Span::new(4, 5));
    }

    #[test]
    fn test_ends_expression() {
        assert!(TokenKind::Semi.ends_expression());
        assert!(TokenKind::Eof.ends_expression());
        assert!(!TokenKind::Plus.ends_expression());
    }
}
