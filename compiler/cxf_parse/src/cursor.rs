//! Token cursor for navigating the token stream.
//!
//! Provides token access, lookahead, and consumption, plus the `>>` split:
//! a shift-right token can be consumed as two `>` tokens while a
//! template-argument list is being closed.

use crate::ParseError;
use cxf_ast::{Token, TokenKind};

/// A saved cursor position, including the half-consumed `>>` state.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Mark {
    pos: usize,
    half_shr: bool,
}

/// Cursor over a token slice. The last token must be `Eof`.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// True when the first `>` of a `>>` token has been consumed; the
    /// current token is then a synthesized `>` one byte further right.
    half_shr: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        debug_assert!(
            matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof),
            "token stream must end with Eof"
        );
        Cursor {
            tokens,
            pos: 0,
            half_shr: false,
        }
    }

    /// The current token.
    #[inline]
    pub fn current(&self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.half_shr {
            Token::new(TokenKind::Gt, tok.offset + 1, 1)
        } else {
            tok
        }
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Source offset of the current token.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.current().offset
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Advance past the current token (or past the remaining half of a
    /// split `>>`).
    pub fn advance(&mut self) -> Token {
        let tok = self.current();
        self.half_shr = false;
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Consume the current `>>` token as a `>`, leaving a `>` at the next
    /// byte as the new current token.
    pub fn split_shr(&mut self) -> Token {
        debug_assert!(!self.half_shr && self.current_kind() == TokenKind::Shr);
        let tok = self.current();
        self.half_shr = true;
        Token::new(TokenKind::Gt, tok.offset, 1)
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind, what: &'static str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::Expected {
                what,
                offset: self.offset(),
            })
        }
    }

    /// Save the cursor state for speculative parsing.
    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            half_shr: self.half_shr,
        }
    }

    /// Roll back to a saved state.
    pub fn rewind(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.half_shr = mark.half_shr;
    }

    /// Move forward to the first token starting at or after `offset`.
    ///
    /// Used when resuming from a fallback variant whose right boundary
    /// lies ahead of the current position.
    pub fn seek_offset(&mut self, offset: u32) {
        self.half_shr = false;
        while self.pos < self.tokens.len() - 1 && self.tokens[self.pos].offset < offset {
            // A `>>` straddling the target offset is entered half way.
            let tok = self.tokens[self.pos];
            if tok.kind == TokenKind::Shr && tok.offset + 1 == offset {
                self.half_shr = true;
                return;
            }
            self.pos += 1;
        }
    }

    /// The remaining tokens from the current position, for lookahead scans.
    pub fn rest(&self) -> &'a [Token] {
        &self.tokens[self.pos..]
    }
}
