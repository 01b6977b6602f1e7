//! Fast classification of an ambiguous `<` token.
//!
//! Before committing to speculative template-argument parsing, a bounded
//! forward scan over raw tokens decides whether the `<` can, cannot, or
//! might open a template-argument list. The scan balances brackets, tracks
//! nested `<`, and classifies by the token following the matching `>`.

use cxf_ast::{Token, TokenKind};

/// How many tokens the forward scan examines before giving up.
const SCAN_LIMIT: usize = 10_000;

/// Verdict of the forward scan.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum AngleHint {
    /// The `<` cannot open a template-argument list.
    No,
    /// Both readings remain possible; a branch point is required.
    Ambiguous,
    /// Only the template-argument reading is possible.
    Yes,
}

/// Classify the `<` at `tokens[0]`.
pub fn template_argument_hint(tokens: &[Token]) -> AngleHint {
    debug_assert!(matches!(tokens.first().map(|t| t.kind), Some(TokenKind::Lt)));
    // Nested `<` that still need a matching `>`.
    let mut angle_depth = 0u32;
    // Bracket nesting; angle tokens inside brackets are invisible.
    let mut bracket_depth = 0u32;

    for tok in tokens.iter().skip(1).take(SCAN_LIMIT) {
        if bracket_depth > 0 {
            match tok.kind {
                TokenKind::LParen | TokenKind::LBracket => bracket_depth += 1,
                TokenKind::RParen | TokenKind::RBracket => bracket_depth -= 1,
                TokenKind::Semi | TokenKind::LBrace | TokenKind::RBrace | TokenKind::Eof => {
                    return AngleHint::No;
                }
                _ => {}
            }
            continue;
        }
        match tok.kind {
            TokenKind::LParen | TokenKind::LBracket => bracket_depth += 1,
            // The expression ends before any matching `>`.
            TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::Semi
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Eof => return AngleHint::No,
            TokenKind::Lt => angle_depth += 1,
            TokenKind::Gt => {
                if angle_depth == 0 {
                    return ends_template_id(following(tokens, tok));
                }
                angle_depth -= 1;
            }
            TokenKind::Shr => {
                // Two `>` at once.
                if angle_depth == 0 {
                    return AngleHint::Yes;
                }
                if angle_depth == 1 {
                    return ends_template_id(following(tokens, tok));
                }
                angle_depth -= 2;
            }
            _ => {}
        }
    }
    AngleHint::Ambiguous
}

/// The token immediately after `after` in source order.
fn following(tokens: &[Token], after: &Token) -> TokenKind {
    tokens
        .iter()
        .find(|t| t.offset >= after.end_offset())
        .map_or(TokenKind::Eof, |t| t.kind)
}

/// Classify by the token following the matching `>`.
///
/// An operand token there rules the template reading out (`a < b > c` has
/// no expression continuation as a template-id); `(` and `::` leave both
/// readings open; anything else rules the relational reading out.
fn ends_template_id(next: TokenKind) -> AngleHint {
    match next {
        TokenKind::LParen | TokenKind::ColonColon => AngleHint::Ambiguous,
        TokenKind::Ident(_) | TokenKind::IntLit(_) => AngleHint::No,
        _ => AngleHint::Yes,
    }
}
