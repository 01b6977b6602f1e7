//! The binary-expression loop.
//!
//! Operators are accumulated in a flat [`OperatorChain`] rather than a tree
//! so that an ambiguous `<` discovered mid-expression can later splice a
//! template-id over part of the chain. Ambiguous names open branch points;
//! operators landing exactly on a candidate's right boundary close its
//! variants; candidates that never close are pruned. If any variant
//! survives to the end of the expression the parser emits a
//! `TemplateIdAmbiguity` node and leaves the decision to semantic
//! resolution.

use crate::cursor::Cursor;
use crate::scan::{template_argument_hint, AngleHint};
use crate::{ParseError, ParsedExpression};
use cxf_ast::{
    build_expression, collect_names, precedence, AngleAmbiguityData, AstArena, ChainTarget,
    NameData, NameKind, NodeId, NodeKind, OperatorChain, Span, Symbol, Token, TokenKind, Variant,
    VariantSet,
};

/// Expression parser over one token stream.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: AstArena,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: AstArena::new(),
        }
    }

    /// Parse one expression and hand back the arena with its root.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn parse_expression(mut self) -> Result<ParsedExpression, ParseError> {
        let root = self.expression()?;
        Ok(ParsedExpression {
            arena: self.arena,
            root,
        })
    }

    /// Sub-expressions recurse through parentheses and template arguments;
    /// grow the stack rather than trusting the input's nesting depth.
    fn expression(&mut self) -> Result<NodeId, ParseError> {
        cxf_stack::ensure_sufficient_stack(|| self.expression_inner())
    }

    fn expression_inner(&mut self) -> Result<NodeId, ParseError> {
        let start = self.cursor.offset();
        let mut chain = OperatorChain::new();
        let mut variants = VariantSet::new();
        let mut expr = self.cast_expression(&mut variants, 0)?;

        loop {
            let tok = self.cursor.current();
            // `>>` closing a nested template-argument list splits into two
            // `>` tokens.
            let (op_tok, pre_consumed) = if tok.kind == TokenKind::Shr
                && variants.has_right_bound(tok.offset + 1)
            {
                (self.cursor.split_shr(), true)
            } else {
                (tok, false)
            };
            let Some((left_prec, right_prec)) = precedence(op_tok.kind) else {
                break;
            };
            // An operator starting exactly at a candidate's right boundary
            // is that candidate's closing context.
            variants.close_variants(op_tok.offset, ChainTarget::Op(chain.len()));
            chain.push(expr, op_tok.kind, op_tok.offset, left_prec, right_prec);
            if !pre_consumed {
                self.cursor.advance();
            }

            expr = match self.cast_expression(&mut variants, chain.len()) {
                Ok(operand) => operand,
                // The relational reading has no operand here; resume from
                // the most recent open candidate instead.
                Err(err) => match variants.select_fallback() {
                    Some(fallback) => {
                        chain.truncate(fallback.left_chain_len);
                        variants.invalidate_targets_at(fallback.left_chain_len);
                        self.cursor.seek_offset(fallback.right_offset);
                        tracing::trace!(offset = fallback.right_offset, "restored from fallback");
                        fallback.expression
                    }
                    None => return Err(err),
                },
            };
        }

        let end_offset = self.cursor.offset();
        variants.close_variants(end_offset, ChainTarget::End);
        variants.remove_invalid();

        if variants.is_empty() {
            if chain.is_empty() {
                return Ok(expr);
            }
            return Ok(build_expression(&mut self.arena, &chain, expr));
        }
        let node = self.arena.alloc(
            NodeKind::TemplateIdAmbiguity(AngleAmbiguityData {
                branch_points: variants.into_ordered_branch_points(),
                chain,
                last_expr: expr,
            }),
            Span::new(start, end_offset),
        );
        self.arena.connect(node);
        Ok(node)
    }

    /// One operand of the binary expression.
    fn cast_expression(
        &mut self,
        variants: &mut VariantSet,
        chain_len: usize,
    ) -> Result<NodeId, ParseError> {
        let tok = self.cursor.current();
        match tok.kind {
            TokenKind::IntLit(value) => {
                self.cursor.advance();
                Ok(self.arena.alloc(NodeKind::Literal { value }, tok.span()))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.expression()?;
                self.cursor.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::Ident(symbol) => {
                self.cursor.advance();
                if !self.cursor.check(TokenKind::Lt) {
                    return Ok(self.id_expression(symbol, tok));
                }
                match template_argument_hint(self.cursor.rest()) {
                    AngleHint::No => Ok(self.id_expression(symbol, tok)),
                    AngleHint::Yes => {
                        let name = self.template_id(symbol, tok)?;
                        let callee = self.wrap_id_expr(name, tok.offset);
                        if self.cursor.check(TokenKind::LParen) {
                            self.call(callee)
                        } else {
                            Ok(callee)
                        }
                    }
                    AngleHint::Ambiguous => {
                        let mark = self.cursor.mark();
                        if let Ok(variant) = self.template_candidate(symbol, tok) {
                            variants.add_branch_point(tok.offset, chain_len, vec![variant]);
                        }
                        self.cursor.rewind(mark);
                        Ok(self.id_expression(symbol, tok))
                    }
                }
            }
            _ => Err(ParseError::UnexpectedToken {
                offset: tok.offset,
            }),
        }
    }

    /// Speculatively parse the template reading of an ambiguous name: the
    /// template-id, plus a call suffix when one follows. The cursor is
    /// rewound by the caller regardless of the outcome.
    fn template_candidate(
        &mut self,
        symbol: Symbol,
        ident: Token,
    ) -> Result<Variant, ParseError> {
        let name = self.template_id(symbol, ident)?;
        let id_expr = self.wrap_id_expr(name, ident.offset);
        let expression = if self.cursor.check(TokenKind::LParen) {
            self.call(id_expr)?
        } else {
            id_expr
        };
        let template_names: Vec<NodeId> = collect_names(&self.arena, expression)
            .into_iter()
            .filter(|&n| {
                self.arena
                    .name(n)
                    .is_some_and(|d| matches!(d.kind, NameKind::TemplateId { .. }))
            })
            .collect();
        Ok(Variant::new(expression, template_names, self.cursor.offset()))
    }

    /// `name < argument , ... >` with the cursor on the `<`.
    fn template_id(&mut self, symbol: Symbol, ident: Token) -> Result<NodeId, ParseError> {
        self.cursor.expect(TokenKind::Lt, "`<`")?;
        let mut arguments = Vec::new();
        if !self.at_close_angle() {
            loop {
                arguments.push(self.template_argument()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.expect_close_angle()?;
        let name = self.arena.alloc(
            NodeKind::Name(NameData::template_id(symbol, arguments)),
            Span::new(ident.offset, close.end_offset()),
        );
        self.arena.connect(name);
        Ok(name)
    }

    fn template_argument(&mut self) -> Result<NodeId, ParseError> {
        let tok = self.cursor.current();
        match tok.kind {
            // An identifier argument is taken as a type; a nested `<`
            // inside an argument list always opens a nested template-id.
            TokenKind::Ident(symbol) => {
                self.cursor.advance();
                let name = if self.cursor.check(TokenKind::Lt) {
                    self.template_id(symbol, tok)?
                } else {
                    self.arena
                        .alloc(NodeKind::Name(NameData::identifier(symbol)), tok.span())
                };
                let spec = self.arena.alloc(
                    NodeKind::DeclSpecifier(cxf_ast::DeclSpecKind::Named { name }),
                    self.arena.get(name).span,
                );
                self.arena.connect(spec);
                let type_id = self.arena.alloc(
                    NodeKind::TypeId {
                        decl_spec: spec,
                        declarator: None,
                    },
                    self.arena.get(spec).span,
                );
                self.arena.connect(type_id);
                Ok(type_id)
            }
            TokenKind::IntLit(value) => {
                self.cursor.advance();
                Ok(self.arena.alloc(NodeKind::Literal { value }, tok.span()))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.expression()?;
                self.cursor.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            _ => Err(ParseError::Expected {
                what: "template argument",
                offset: tok.offset,
            }),
        }
    }

    fn at_close_angle(&self) -> bool {
        matches!(self.cursor.current_kind(), TokenKind::Gt | TokenKind::Shr)
    }

    fn expect_close_angle(&mut self) -> Result<Token, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Gt => Ok(self.cursor.advance()),
            TokenKind::Shr => Ok(self.cursor.split_shr()),
            _ => Err(ParseError::Expected {
                what: "`>`",
                offset: self.cursor.offset(),
            }),
        }
    }

    /// `( expression )` call suffix.
    fn call(&mut self, callee: NodeId) -> Result<NodeId, ParseError> {
        self.cursor.expect(TokenKind::LParen, "`(`")?;
        let mut arguments = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            arguments.push(self.expression()?);
        }
        let close = self.cursor.expect(TokenKind::RParen, "`)`")?;
        let span = self.arena.get(callee).span.to(close.span());
        let call = self.arena.alloc(NodeKind::Call { callee, arguments }, span);
        self.arena.connect(call);
        Ok(call)
    }

    fn id_expression(&mut self, symbol: Symbol, ident: Token) -> NodeId {
        let name = self
            .arena
            .alloc(NodeKind::Name(NameData::identifier(symbol)), ident.span());
        self.wrap_id_expr(name, ident.offset)
    }

    fn wrap_id_expr(&mut self, name: NodeId, start: u32) -> NodeId {
        let span = Span::new(start, self.arena.get(name).span.end);
        let expr = self.arena.alloc(NodeKind::IdExpr { name }, span);
        self.arena.connect(expr);
        expr
    }
}
