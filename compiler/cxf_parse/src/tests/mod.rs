#![allow(clippy::unwrap_used, clippy::expect_used)]


use cxf_ast::{StringInterner, Symbol, Token, TokenKind};

/// Tokenize a test snippet. Adjacent `>>` lexes as a single shift token,
/// matching what a real lexer hands the parser.
pub(crate) fn lex(source: &str, interner: &StringInterner) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        let offset = u32::try_from(i).unwrap();
        match b {
            b' ' | b'\t' | b'\n' => {
                i += 1;
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let sym = interner.intern(&source[start..i]);
                tokens.push(Token::new(
                    TokenKind::Ident(sym),
                    offset,
                    u32::try_from(i - start).unwrap(),
                ));
            }
            b'0'..=b'9' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                let value: i64 = source[start..i].parse().unwrap();
                tokens.push(Token::new(
                    TokenKind::IntLit(value),
                    offset,
                    u32::try_from(i - start).unwrap(),
                ));
            }
            _ => {
                let two = bytes.get(i + 1).map(|&n| (b, n));
                let (kind, len) = match two {
                    Some((b'>', b'>')) => (TokenKind::Shr, 2),
                    Some((b'<', b'<')) => (TokenKind::Shl, 2),
                    Some((b'<', b'=')) => (TokenKind::LtEq, 2),
                    Some((b'>', b'=')) => (TokenKind::GtEq, 2),
                    Some((b'=', b'=')) => (TokenKind::EqEq, 2),
                    Some((b'!', b'=')) => (TokenKind::NotEq, 2),
                    Some((b':', b':')) => (TokenKind::ColonColon, 2),
                    _ => {
                        let kind = match b {
                            b'<' => TokenKind::Lt,
                            b'>' => TokenKind::Gt,
                            b'+' => TokenKind::Plus,
                            b'-' => TokenKind::Minus,
                            b'*' => TokenKind::Star,
                            b'/' => TokenKind::Slash,
                            b'=' => TokenKind::Assign,
                            b',' => TokenKind::Comma,
                            b';' => TokenKind::Semi,
                            b'(' => TokenKind::LParen,
                            b')' => TokenKind::RParen,
                            b'[' => TokenKind::LBracket,
                            b']' => TokenKind::RBracket,
                            b'{' => TokenKind::LBrace,
                            b'}' => TokenKind::RBrace,
                            other => panic!("unhandled byte {other:?} in test source"),
                        };
                        (kind, 1)
                    }
                };
                tokens.push(Token::new(kind, offset, len));
                i += len as usize;
            }
        }
    }
    tokens.push(Token::new(
        TokenKind::Eof,
        u32::try_from(bytes.len()).unwrap(),
        0,
    ));
    tokens
}

pub(crate) fn symbol(interner: &StringInterner, s: &str) -> Symbol {
    interner.intern(s)
}
