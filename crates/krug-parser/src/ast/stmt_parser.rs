//! Statement parsing functions for Krug.
//!
//! Implements parsing of control flow, bindings, jumps and blocks.
//! Statements not ending in a block must be followed by `;`.

use super::parser::Parser;
use crate::ast::decl::VarDecl;
use crate::ast::node::Ident;
use crate::ast::stmt::*;
use bumpalo::collections::Vec as BVec;
use krug_core::{ParseError, ParseErrorKind};

impl<'ast> Parser<'ast> {
    /// Parse a statement.
    ///
    /// Dispatches on the leading keyword; anything else is a
    /// semicolon-terminated statement.
    pub fn parse_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let token = self.peek();

        if token.is_keyword("if") {
            return self.parse_if();
        }
        if token.is_keyword("loop") {
            return self.parse_loop();
        }
        if token.is_keyword("while") {
            return self.parse_while();
        }
        if token.is_keyword("defer") {
            return self.parse_defer();
        }
        if token.is_symbol("{") {
            return Ok(Stmt::Block(self.parse_block()?));
        }

        let stmt = self.parse_simple_statement()?;
        self.expect_semicolon();
        Ok(stmt)
    }

    /// Statements that end in `;`. The semicolon is left for the caller.
    fn parse_simple_statement(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let token = self.peek();

        if token.is_keyword("let") {
            return Ok(Stmt::Let(self.parse_var_decl()?));
        }
        if token.is_keyword("mut") {
            return Ok(Stmt::Mut(self.parse_var_decl()?));
        }
        if token.is_keyword("type") {
            return Ok(Stmt::TypeAlias(self.parse_type_alias()?));
        }
        if token.is_keyword("return") {
            self.advance();
            let value = if self.check_symbol(";") || self.check_symbol("}") {
                None
            } else {
                let expr = self.parse_expr()?;
                Some(self.alloc(expr))
            };
            return Ok(Stmt::Return(ReturnStmt {
                value,
                span: self.span_from(token.span),
            }));
        }
        if token.is_keyword("break") {
            self.advance();
            return Ok(Stmt::Break(token.span));
        }
        if token.is_keyword("next") {
            self.advance();
            return Ok(Stmt::Next(token.span));
        }
        if token.is_keyword("jump") {
            self.advance();
            let label = self.expect_identifier()?;
            return Ok(Stmt::Jump(JumpStmt {
                label,
                span: self.span_from(token.span),
            }));
        }
        if token.is_symbol("$") {
            self.advance();
            let name = self.expect_identifier()?;
            return Ok(Stmt::Label(Ident::new(name.name, token.span.merge(name.span))));
        }

        let expr = self.parse_expr()?;
        Ok(Stmt::Expr(ExprStmt {
            expr,
            span: expr.span(),
        }))
    }

    /// `let`/`mut` `[~]name [Type] [= value]`
    ///
    /// The type is parsed unless the name is followed by `=` or `;`.
    pub(super) fn parse_var_decl(&mut self) -> Result<VarDecl<'ast>, ParseError> {
        let keyword = self.advance();
        let mutable = keyword.is_keyword("mut");
        let owned = self.eat_symbol("~").is_none();
        let name = self.expect_identifier()?;

        let ty = if self.check_symbol("=") || self.check_symbol(";") {
            None
        } else {
            Some(self.parse_type()?)
        };
        let value = if self.eat_symbol("=").is_some() {
            let expr = self.parse_expr()?;
            Some(self.alloc(expr))
        } else {
            None
        };

        Ok(VarDecl {
            name,
            mutable,
            owned,
            ty,
            value,
            span: self.span_from(keyword.span),
        })
    }

    /// `{ stmt* }`
    ///
    /// Statement errors are recorded and the block continues after
    /// recovering; only a missing brace fails the block itself.
    pub fn parse_block(&mut self) -> Result<Block<'ast>, ParseError> {
        if !self.check_symbol("{") {
            let token = self.peek();
            return Err(ParseError::new(
                ParseErrorKind::ExpectedBlock,
                token.span,
                format!("expected block, found {}", token.describe()),
            ));
        }
        let open = self.advance();

        let mut stmts = BVec::new_in(self.arena);
        while !self.check_symbol("}") && !self.is_eof() {
            let start = self.position;
            match self.parse_statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize(start);
                }
            }
        }
        self.expect_symbol("}")?;

        Ok(Block {
            stmts: stmts.into_bump_slice(),
            span: self.span_from(open.span),
        })
    }

    /// `if cond { } [else if cond { }]* [else { }]`
    ///
    /// Arms after a final `else` are reported but still parsed so the
    /// rest of the chain does not cascade into further errors.
    fn parse_if(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let if_token = self.advance();
        let condition = self.parse_expr()?;
        let then_block = self.parse_block()?;

        let mut else_ifs = BVec::new_in(self.arena);
        let mut else_block: Option<Block<'ast>> = None;

        while let Some(else_token) = self.eat_keyword("else") {
            if self.eat_keyword("if").is_some() {
                let condition = self.parse_expr()?;
                let block = self.parse_block()?;
                let span = else_token.span.merge(block.span);
                if else_block.is_some() {
                    self.error(
                        ParseErrorKind::MalformedElseIf,
                        span,
                        "'else if' after the final 'else'",
                    );
                } else {
                    else_ifs.push(ElseIf {
                        condition,
                        block,
                        span,
                    });
                }
            } else if self.check_symbol("{") {
                let block = self.parse_block()?;
                if else_block.is_some() {
                    self.error(
                        ParseErrorKind::DuplicateElse,
                        else_token.span.merge(block.span),
                        "'if' statement already has an 'else' block",
                    );
                } else {
                    else_block = Some(block);
                }
            } else {
                let found = self.peek().describe();
                self.error(
                    ParseErrorKind::MalformedElseIf,
                    else_token.span,
                    format!("expected 'if' or block after 'else', found {found}"),
                );
                break;
            }
        }

        Ok(Stmt::If(self.alloc(IfStmt {
            condition,
            then_block,
            else_ifs: else_ifs.into_bump_slice(),
            else_block,
            span: self.span_from(if_token.span),
        })))
    }

    /// `while cond [; post] { }`
    fn parse_while(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let while_token = self.advance();
        let condition = self.parse_expr()?;
        let post = if self.eat_symbol(";").is_some() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let body = self.parse_block()?;

        Ok(Stmt::While(self.alloc(WhileStmt {
            condition,
            post,
            body,
            span: self.span_from(while_token.span),
        })))
    }

    /// `loop { }`
    fn parse_loop(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let loop_token = self.advance();
        let body = self.parse_block()?;
        Ok(Stmt::Loop(LoopStmt {
            body,
            span: self.span_from(loop_token.span),
        }))
    }

    /// `defer { }` or `defer stmt`
    fn parse_defer(&mut self) -> Result<Stmt<'ast>, ParseError> {
        let defer_token = self.advance();
        let body = if self.check_symbol("{") {
            DeferBody::Block(self.parse_block()?)
        } else {
            let stmt = self.parse_statement()?;
            DeferBody::Stmt(self.alloc(stmt))
        };

        Ok(Stmt::Defer(self.alloc(DeferStmt {
            body,
            span: self.span_from(defer_token.span),
        })))
    }
}
