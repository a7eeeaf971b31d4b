//! Type parsing functions for Krug.
//!
//! Implements parsing of type expressions:
//! - Named types (`int`, `Node`)
//! - Pointers (`*T`)
//! - Fixed-size arrays (`[T; n]`)
//! - Tuples (`(A, B)`)
//! - Anonymous structures (`struct { x int, }`)

use super::parser::Parser;
use crate::ast::types::*;
use bumpalo::collections::Vec as BVec;
use krug_core::ParseError;

impl<'ast> Parser<'ast> {
    /// Parse a complete type expression.
    pub fn parse_type(&mut self) -> Result<TypeExpr<'ast>, ParseError> {
        let token = self.peek();

        if token.is_symbol("*") {
            self.advance();
            let base = self.parse_type()?;
            return Ok(TypeExpr::Pointer(PointerType {
                base: self.alloc(base),
                span: self.span_from(token.span),
            }));
        }

        if token.is_symbol("[") {
            self.advance();
            let base = self.parse_type()?;
            self.expect_symbol(";")?;
            let size = self.parse_expr()?;
            self.expect_symbol("]")?;
            return Ok(TypeExpr::Array(ArrayType {
                base: self.alloc(base),
                size: self.alloc(size),
                span: self.span_from(token.span),
            }));
        }

        if token.is_symbol("(") {
            self.advance();
            let mut elements = BVec::new_in(self.arena);
            loop {
                self.eat_symbol(",");
                if self.check_symbol(")") || self.is_eof() {
                    break;
                }
                elements.push(self.parse_type()?);
            }
            self.expect_symbol(")")?;
            return Ok(TypeExpr::Tuple(TupleType {
                elements: elements.into_bump_slice(),
                span: self.span_from(token.span),
            }));
        }

        if token.is_keyword("struct") {
            return Ok(TypeExpr::Structure(self.parse_struct_body()?));
        }

        if token.is_plain_identifier() {
            let name = self.expect_identifier()?;
            return Ok(TypeExpr::Named(name));
        }

        Err(ParseError::expected_type(token.span, &token.describe()))
    }

    /// `struct { name Type, ... }` with a comma after every field.
    pub(super) fn parse_struct_body(&mut self) -> Result<StructType<'ast>, ParseError> {
        let keyword = self.expect_keyword("struct")?;
        self.expect_symbol("{")?;

        let mut fields = BVec::new_in(self.arena);
        while !self.check_symbol("}") && !self.is_eof() {
            let name = self.expect_identifier()?;
            let ty = self.parse_type()?;
            self.expect_symbol(",")?;
            fields.push(FieldDecl {
                name,
                ty,
                owned: false,
                mutable: true,
                span: self.span_from(name.span),
            });
        }
        self.expect_symbol("}")?;

        Ok(StructType {
            fields: fields.into_bump_slice(),
            span: self.span_from(keyword.span),
        })
    }
}
