//! Expression parsing using precedence climbing.
//!
//! An expression is a left operand followed by one of: a `.` chain, an
//! assignment, or a run of binary operators. Operands of binary
//! operators are primaries, optionally followed by their own `.` chain.

use crate::ast::expr::*;
use crate::ast::ops::{AssignOp, BinaryOp, Builtin, UnaryOp};
use crate::ast::parser::Parser;
use crate::ast::node::Ident;
use crate::lexer::TokenKind;
use bumpalo::collections::Vec as BVec;
use krug_core::{ParseError, ParseErrorKind};
use ordered_float::OrderedFloat;

impl<'ast> Parser<'ast> {
    /// Parse a full expression.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_expr(&mut self) -> Result<Expr<'ast>, ParseError> {
        let left = self.parse_primary()?;

        if self.check_symbol(".") {
            return self.parse_dot_list(left);
        }
        if let Some(op) = self.peek_assign_op() {
            return self.parse_assign(left, op);
        }
        if self.peek_binary_op().is_some() {
            return self.parse_precedence(0, left);
        }
        Ok(left)
    }

    /// The binary operator at the current position, if any.
    fn peek_binary_op(&self) -> Option<BinaryOp> {
        let token = self.peek();
        if token.kind != TokenKind::Symbol {
            return None;
        }
        BinaryOp::from_symbol(token.lexeme)
    }

    /// The assignment operator at the current position, if any.
    ///
    /// Compound operators lex as two symbols; they only count when the
    /// `=` directly follows the operator with no space between.
    fn peek_assign_op(&self) -> Option<AssignOp> {
        let token = self.peek();
        if token.is_symbol("=") {
            return Some(AssignOp::Assign);
        }
        if token.kind != TokenKind::Symbol {
            return None;
        }
        let next = self.peek_nth(1);
        if next.is_symbol("=") && next.span.start == token.span.end {
            AssignOp::compound(token.lexeme)
        } else {
            None
        }
    }

    /// Precedence climbing over binary operators.
    ///
    /// Operators below `min_prec` are left for the caller. Equal
    /// precedence associates to the left.
    fn parse_precedence(
        &mut self,
        min_prec: u8,
        mut left: Expr<'ast>,
    ) -> Result<Expr<'ast>, ParseError> {
        while let Some(op) = self.peek_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();

            let mut right = self.parse_operand_path()?;
            if let Some(next) = self.peek_binary_op()
                && next.precedence() > prec
            {
                right = self.parse_precedence(prec + 1, right)?;
            }

            let span = left.span().merge(right.span());
            left = Expr::Binary(self.alloc(BinaryExpr {
                left,
                op,
                right,
                span,
            }));
        }
        Ok(left)
    }

    /// A binary operand: a primary with an optional `.` chain of primaries.
    fn parse_operand_path(&mut self) -> Result<Expr<'ast>, ParseError> {
        let first = self.parse_primary()?;
        if !self.check_symbol(".") {
            return Ok(first);
        }

        let mut elements = BVec::new_in(self.arena);
        elements.push(first);
        while self.eat_symbol(".").is_some() {
            elements.push(self.parse_primary()?);
        }
        let span = self.span_from(first.span());
        Ok(Expr::Path(PathExpr {
            elements: elements.into_bump_slice(),
            span,
        }))
    }

    /// `left . expr . expr ...`
    ///
    /// Each element after a dot is a full expression, so `a.b + 1` parses
    /// as the chain `[a, b + 1]`; nested chains are spliced in place.
    fn parse_dot_list(&mut self, left: Expr<'ast>) -> Result<Expr<'ast>, ParseError> {
        let mut elements = BVec::new_in(self.arena);
        elements.push(left);

        while self.eat_symbol(".").is_some() {
            match self.parse_expr()? {
                Expr::Path(path) => elements.extend(path.elements.iter().copied()),
                value => elements.push(value),
            }
        }

        let span = self.span_from(left.span());
        Ok(Expr::Path(PathExpr {
            elements: elements.into_bump_slice(),
            span,
        }))
    }

    /// `target op value`, right associative.
    fn parse_assign(&mut self, target: Expr<'ast>, op: AssignOp) -> Result<Expr<'ast>, ParseError> {
        if op != AssignOp::Assign {
            self.advance();
        }
        self.expect_symbol("=")?;

        let value = self.parse_expr()?;
        let span = target.span().merge(value.span());
        Ok(Expr::Assign(self.alloc(AssignExpr {
            target,
            op,
            value,
            span,
        })))
    }

    /// Prefix forms, then an operand with any call or index postfixes.
    fn parse_primary(&mut self) -> Result<Expr<'ast>, ParseError> {
        let token = self.peek();

        if token.is_keyword("struct") || token.is_symbol("*") || token.is_symbol("[") {
            let ty = self.parse_type()?;
            return Ok(Expr::Type(self.alloc(ty)));
        }
        if token.is_symbol(":") {
            return self.parse_initializer();
        }
        if token.is_keyword("fn") {
            return self.parse_lambda();
        }
        if token.kind == TokenKind::Symbol
            && let Some(op) = UnaryOp::from_symbol(token.lexeme)
        {
            self.advance();
            let operand = self.parse_primary()?;
            let span = token.span.merge(operand.span());
            return Ok(Expr::Unary(self.alloc(UnaryExpr { op, operand, span })));
        }
        if token.kind == TokenKind::Identifier
            && self.peek_nth(1).is_symbol("!")
            && let Some(builtin) = Builtin::from_name(token.lexeme)
        {
            return self.parse_builtin(builtin);
        }

        let mut expr = self.parse_operand()?;
        loop {
            if self.check_symbol("(") {
                expr = self.parse_call(expr)?;
            } else if self.check_symbol("[") {
                expr = self.parse_index(expr)?;
            } else {
                return Ok(expr);
            }
        }
    }

    /// Literals, identifiers, and parenthesized forms.
    fn parse_operand(&mut self) -> Result<Expr<'ast>, ParseError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let kind = if token.lexeme.contains('.') {
                    token.lexeme.parse::<f64>().map(|v| LiteralKind::Float(OrderedFloat(v))).ok()
                } else {
                    token.lexeme.parse::<u128>().map(LiteralKind::Int).ok()
                };
                match kind {
                    Some(kind) => Ok(Expr::Literal(LiteralExpr {
                        kind,
                        span: token.span,
                    })),
                    None => Err(ParseError::new(
                        ParseErrorKind::InvalidLiteral,
                        token.span,
                        format!("number literal '{}' is out of range", token.lexeme),
                    )),
                }
            }
            TokenKind::String => {
                self.advance();
                let contents = &token.lexeme[1..token.lexeme.len() - 1];
                Ok(Expr::Literal(LiteralExpr {
                    kind: LiteralKind::String(contents),
                    span: token.span,
                }))
            }
            TokenKind::Char => {
                self.advance();
                let inner = token.lexeme.strip_prefix('\'').and_then(|rest| rest.strip_suffix('\''));
                let mut chars = inner.unwrap_or_default().chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(Expr::Literal(LiteralExpr {
                        kind: LiteralKind::Char(ch),
                        span: token.span,
                    })),
                    _ => Err(ParseError::new(
                        ParseErrorKind::InvalidLiteral,
                        token.span,
                        format!("character literal {} must hold one character", token.lexeme),
                    )),
                }
            }
            TokenKind::Identifier if token.is_plain_identifier() => {
                self.advance();
                Ok(Expr::Ident(Ident::new(token.lexeme, token.span)))
            }
            TokenKind::Symbol if token.is_symbol("(") => self.parse_paren(),
            TokenKind::EndOfFile => Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                token.span,
                "expected expression, found end of file",
            )),
            _ => Err(ParseError::expected_expression(token.span, &token.describe())),
        }
    }

    /// `(expr)` or `(a, b, ...)`
    fn parse_paren(&mut self) -> Result<Expr<'ast>, ParseError> {
        let open = self.expect_symbol("(")?;
        let first = self.parse_expr()?;

        if !self.check_symbol(",") {
            self.expect_symbol(")")?;
            let span = self.span_from(open.span);
            return Ok(Expr::Grouping(self.alloc(ParenExpr { expr: first, span })));
        }

        let mut elements = BVec::new_in(self.arena);
        elements.push(first);
        while self.eat_symbol(",").is_some() {
            if self.check_symbol(")") {
                break;
            }
            elements.push(self.parse_expr()?);
        }
        self.expect_symbol(")")?;

        Ok(Expr::List(ListExpr {
            elements: elements.into_bump_slice(),
            span: self.span_from(open.span),
        }))
    }

    /// `callee(a, b, ...)`
    fn parse_call(&mut self, callee: Expr<'ast>) -> Result<Expr<'ast>, ParseError> {
        self.expect_symbol("(")?;
        let args = self.parse_call_args()?;
        let span = self.span_from(callee.span());
        Ok(Expr::Call(self.alloc(CallExpr { callee, args, span })))
    }

    /// Comma separated arguments up to and including `)`. The `(` has
    /// already been consumed.
    fn parse_call_args(&mut self) -> Result<&'ast [Expr<'ast>], ParseError> {
        let mut args = BVec::new_in(self.arena);
        while !self.check_symbol(")") {
            if !args.is_empty() {
                self.expect_symbol(",")?;
            }
            args.push(self.parse_expr()?);
        }
        self.expect_symbol(")")?;
        Ok(args.into_bump_slice())
    }

    /// `object[index]`
    fn parse_index(&mut self, object: Expr<'ast>) -> Result<Expr<'ast>, ParseError> {
        self.expect_symbol("[")?;
        let index = self.parse_expr()?;
        self.expect_symbol("]")?;
        let span = self.span_from(object.span());
        Ok(Expr::Index(self.alloc(IndexExpr {
            object,
            index,
            span,
        })))
    }

    /// `:Name{a, b, ...}`
    fn parse_initializer(&mut self) -> Result<Expr<'ast>, ParseError> {
        let colon = self.expect_symbol(":")?;
        let name = self.expect_identifier()?;
        self.expect_symbol("{")?;

        let mut values = BVec::new_in(self.arena);
        loop {
            self.eat_symbol(",");
            if self.check_symbol("}") || self.is_eof() {
                break;
            }
            values.push(self.parse_expr()?);
        }
        self.expect_symbol("}")?;

        Ok(Expr::Init(InitExpr {
            kind: InitKind::Structure,
            name: Some(name),
            values: values.into_bump_slice(),
            span: self.span_from(colon.span),
        }))
    }

    /// `name!operand`, `name!operand(args)` or `name!(operand, args)`
    fn parse_builtin(&mut self, builtin: Builtin) -> Result<Expr<'ast>, ParseError> {
        let start = self.advance();
        self.expect_symbol("!")?;

        let (operand, args) = if self.eat_symbol("(").is_some() {
            let operand = self.expect_identifier()?;
            let mut args = BVec::new_in(self.arena);
            while self.eat_symbol(",").is_some() {
                args.push(self.parse_expr()?);
            }
            self.expect_symbol(")")?;
            (operand, args.into_bump_slice())
        } else {
            let operand = self.expect_identifier()?;
            let args = if self.eat_symbol("(").is_some() {
                self.parse_call_args()?
            } else {
                &[]
            };
            (operand, args)
        };

        Ok(Expr::Builtin(BuiltinExpr {
            builtin,
            operand,
            args,
            span: self.span_from(start.span),
        }))
    }

    /// `fn(params) [Ret] { body }`
    fn parse_lambda(&mut self) -> Result<Expr<'ast>, ParseError> {
        let proto = self.parse_prototype(true)?;
        let body = self.parse_block()?;
        let span = proto.span.merge(body.span);
        Ok(Expr::Lambda(self.alloc(LambdaExpr { proto, body, span })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use krug_core::Span;
    use bumpalo::Bump;
    use test_log::test;

    fn parse<'ast>(source: &str, arena: &'ast Bump) -> Result<Expr<'ast>, ParseError> {
        let (tokens, _) = tokenize(source);
        let mut parser = Parser::new(&tokens, arena);
        parser.parse_expr()
    }

    fn int(expr: &Expr<'_>) -> u128 {
        match expr {
            Expr::Literal(LiteralExpr {
                kind: LiteralKind::Int(v),
                ..
            }) => *v,
            other => panic!("expected integer literal, got {other:?}"),
        }
    }

    fn ident<'a>(expr: &Expr<'a>) -> &'a str {
        match expr {
            Expr::Ident(id) => id.name,
            other => panic!("expected identifier, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter() {
        let arena = Bump::new();
        let Expr::Binary(add) = parse("1 + 2 * 3", &arena).unwrap() else {
            panic!("expected binary");
        };
        assert_eq!(add.op, BinaryOp::Add);
        assert_eq!(int(&add.left), 1);
        let Expr::Binary(mul) = add.right else {
            panic!("expected binary on the right");
        };
        assert_eq!(mul.op, BinaryOp::Mul);
        assert_eq!(int(&mul.left), 2);
        assert_eq!(int(&mul.right), 3);
    }

    #[test]
    fn same_precedence_is_left_associative() {
        let arena = Bump::new();
        let Expr::Binary(outer) = parse("1 - 2 - 3", &arena).unwrap() else {
            panic!("expected binary");
        };
        assert_eq!(int(&outer.right), 3);
        let Expr::Binary(inner) = outer.left else {
            panic!("expected nested binary on the left");
        };
        assert_eq!(int(&inner.left), 1);
        assert_eq!(int(&inner.right), 2);
    }

    #[test]
    fn logical_operators_bind_loosest() {
        let arena = Bump::new();
        let Expr::Binary(or) = parse("a || b && c == d", &arena).unwrap() else {
            panic!("expected binary");
        };
        assert_eq!(or.op, BinaryOp::LogicalOr);
        let Expr::Binary(and) = or.right else {
            panic!("expected && on the right");
        };
        assert_eq!(and.op, BinaryOp::LogicalAnd);
        let Expr::Binary(eq) = and.right else {
            panic!("expected == under &&");
        };
        assert_eq!(eq.op, BinaryOp::Equal);
    }

    #[test]
    fn lower_precedence_after_higher() {
        let arena = Bump::new();
        let Expr::Binary(sub) = parse("1 + 2 * 3 - 4", &arena).unwrap() else {
            panic!("expected binary");
        };
        assert_eq!(sub.op, BinaryOp::Sub);
        assert_eq!(int(&sub.right), 4);
        let Expr::Binary(add) = sub.left else {
            panic!("expected + on the left");
        };
        assert_eq!(add.op, BinaryOp::Add);
    }

    #[test]
    fn dotted_chain_is_flat() {
        let arena = Bump::new();
        let Expr::Path(path) = parse("a.b.c", &arena).unwrap() else {
            panic!("expected path");
        };
        let names: Vec<_> = path.elements.iter().map(ident).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn chain_element_absorbs_binary() {
        let arena = Bump::new();
        let Expr::Path(path) = parse("a.b + 1", &arena).unwrap() else {
            panic!("expected path");
        };
        assert_eq!(path.elements.len(), 2);
        assert!(matches!(path.elements[1], Expr::Binary(b) if b.op == BinaryOp::Add));
    }

    #[test]
    fn chain_as_binary_operand() {
        let arena = Bump::new();
        let Expr::Binary(add) = parse("x + a.b", &arena).unwrap() else {
            panic!("expected binary");
        };
        assert!(matches!(add.right, Expr::Path(p) if p.elements.len() == 2));
    }

    #[test]
    fn assignment_is_right_associative() {
        let arena = Bump::new();
        let Expr::Assign(outer) = parse("a = b = 1", &arena).unwrap() else {
            panic!("expected assignment");
        };
        assert_eq!(ident(&outer.target), "a");
        assert!(matches!(outer.value, Expr::Assign(_)));
    }

    #[test]
    fn compound_assignment_needs_adjacent_tokens() {
        let arena = Bump::new();
        let Expr::Assign(assign) = parse("x += 2", &arena).unwrap() else {
            panic!("expected assignment");
        };
        assert_eq!(assign.op, AssignOp::AddAssign);

        // `+ =` with a space is an addition whose right side is missing.
        assert!(parse("x + = 2", &arena).is_err());
    }

    #[test]
    fn unary_prefix() {
        let arena = Bump::new();
        let Expr::Unary(neg) = parse("-x", &arena).unwrap() else {
            panic!("expected unary");
        };
        assert_eq!(neg.op, UnaryOp::Neg);

        let Expr::Unary(deref) = parse("@ptr", &arena).unwrap() else {
            panic!("expected unary");
        };
        assert_eq!(deref.op, UnaryOp::Deref);
    }

    #[test]
    fn call_and_index_postfixes() {
        let arena = Bump::new();
        let Expr::Call(call) = parse("f(1, g(2))", &arena).unwrap() else {
            panic!("expected call");
        };
        assert_eq!(ident(&call.callee), "f");
        assert_eq!(call.args.len(), 2);

        let Expr::Index(index) = parse("m[0][1]", &arena).unwrap() else {
            panic!("expected index");
        };
        assert!(matches!(index.object, Expr::Index(_)));
        assert_eq!(int(&index.index), 1);
    }

    #[test]
    fn grouping_and_lists() {
        let arena = Bump::new();
        let Expr::Binary(mul) = parse("(1 + 2) * 3", &arena).unwrap() else {
            panic!("expected binary");
        };
        assert!(matches!(mul.left, Expr::Grouping(_)));

        let Expr::List(list) = parse("(1, 2, 3)", &arena).unwrap() else {
            panic!("expected list");
        };
        assert_eq!(list.elements.len(), 3);
    }

    #[test]
    fn literals() {
        let arena = Bump::new();
        assert!(matches!(
            parse("1.5", &arena).unwrap(),
            Expr::Literal(LiteralExpr { kind: LiteralKind::Float(f), .. }) if f.0 == 1.5
        ));
        assert!(matches!(
            parse("\"hi\"", &arena).unwrap(),
            Expr::Literal(LiteralExpr { kind: LiteralKind::String("hi"), .. })
        ));
        assert!(matches!(
            parse("'z'", &arena).unwrap(),
            Expr::Literal(LiteralExpr { kind: LiteralKind::Char('z'), .. })
        ));
    }

    #[test]
    fn char_token_must_hold_one_character() {
        let arena = Bump::new();
        for lexeme in ["''", "'ab'"] {
            let tokens = [crate::lexer::Token::new(TokenKind::Char, lexeme, Span::new(0, lexeme.len() as u32))];
            let err = Parser::new(&tokens, &arena).parse_expr().unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::InvalidLiteral, "{lexeme}");
        }

        // The lexer never hands `''` over as a char.
        assert!(parse("''", &arena).is_err());
    }

    #[test]
    fn oversized_integer_is_rejected() {
        let arena = Bump::new();
        let err = parse("999999999999999999999999999999999999999999", &arena).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidLiteral);
    }

    #[test]
    fn initializer() {
        let arena = Bump::new();
        let Expr::Init(init) = parse(":Point{1, 2}", &arena).unwrap() else {
            panic!("expected initializer");
        };
        assert_eq!(init.name.map(|n| n.name), Some("Point"));
        assert_eq!(init.values.len(), 2);
    }

    #[test]
    fn builtin_forms() {
        let arena = Bump::new();
        let Expr::Builtin(size) = parse("sizeof!int", &arena).unwrap() else {
            panic!("expected builtin");
        };
        assert_eq!(size.builtin, Builtin::Sizeof);
        assert_eq!(size.operand.name, "int");
        assert!(size.args.is_empty());

        let Expr::Builtin(alloc) = parse("alloc!(Node, 4)", &arena).unwrap() else {
            panic!("expected builtin");
        };
        assert_eq!(alloc.operand.name, "Node");
        assert_eq!(alloc.args.len(), 1);

        // Without `!` the name is an ordinary variable.
        assert_eq!(ident(&parse("len", &arena).unwrap()), "len");
    }

    #[test]
    fn type_in_expression_position() {
        let arena = Bump::new();
        assert!(matches!(parse("*int", &arena).unwrap(), Expr::Type(_)));
        assert!(matches!(parse("[int; 4]", &arena).unwrap(), Expr::Type(_)));
    }

    #[test]
    fn lambda() {
        let arena = Bump::new();
        let Expr::Lambda(lambda) = parse("fn(x int) int { return x; }", &arena).unwrap() else {
            panic!("expected lambda");
        };
        assert!(lambda.proto.name.is_none());
        assert_eq!(lambda.proto.params.len(), 1);
        assert_eq!(lambda.body.stmts.len(), 1);
    }

    #[test]
    fn missing_operand() {
        let arena = Bump::new();
        let err = parse(")", &arena).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedExpression);

        let err = parse("", &arena).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }
}
