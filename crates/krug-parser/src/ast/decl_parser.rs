//! Declaration parsing functions for Krug.
//!
//! Implements parsing of top-level items: functions, structures, type
//! aliases, impl blocks, traits, globals and compile-time directives.

use super::parser::Parser;
use crate::ast::decl::*;
use crate::ast::types::TypeExpr;
use bumpalo::collections::Vec as BVec;
use krug_core::{ParseError, ParseErrorKind};
use tracing::trace;

impl<'ast> Parser<'ast> {
    /// Parse one top-level item.
    ///
    /// Returns `Ok(None)` for constructs that produce no item: directives,
    /// and expression statements, which are reported as misplaced.
    pub(super) fn parse_item(&mut self) -> Result<Option<Item<'ast>>, ParseError> {
        let token = self.peek();

        if token.is_symbol("#") {
            self.skip_directive()?;
            return Ok(None);
        }
        if token.is_keyword("fn") {
            return Ok(Some(Item::Function(self.parse_function()?)));
        }
        if token.is_keyword("impl") {
            return Ok(Some(Item::Impl(self.parse_impl()?)));
        }
        if token.is_keyword("trait") {
            return Ok(Some(Item::Trait(self.parse_trait()?)));
        }
        if token.is_keyword("type") {
            let alias = self.parse_type_alias()?;
            self.expect_semicolon();
            return Ok(Some(match alias.ty {
                TypeExpr::Structure(body) => Item::Structure(StructDecl {
                    name: alias.name,
                    body,
                    span: alias.span,
                }),
                _ => Item::TypeAlias(alias),
            }));
        }
        if token.is_keyword("let") || token.is_keyword("mut") {
            let global = self.parse_var_decl()?;
            self.expect_semicolon();
            return Ok(Some(Item::Global(global)));
        }

        // Anything else only makes sense inside a function body. Parse it
        // anyway so recovery resumes after it.
        let stmt = self.parse_statement()?;
        self.error(
            ParseErrorKind::MisplacedStatement,
            stmt.span(),
            "statements are not allowed at the top level",
        );
        Ok(None)
    }

    /// `#{ ... }`: compile-time directives are skipped, nested braces
    /// included.
    fn skip_directive(&mut self) -> Result<(), ParseError> {
        let hash = self.expect_symbol("#")?;
        self.expect_symbol("{")?;

        let mut depth = 1usize;
        while depth > 0 {
            let token = self.advance();
            if token.is_eof() {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedEof,
                    hash.span.merge(token.span),
                    "unterminated directive",
                ));
            }
            if token.is_symbol("{") {
                depth += 1;
            } else if token.is_symbol("}") {
                depth -= 1;
            }
        }
        trace!(span = %self.span_from(hash.span), "skipped directive");
        Ok(())
    }

    /// `fn name(params) [Ret] { body }`
    pub fn parse_function(&mut self) -> Result<FunctionDecl<'ast>, ParseError> {
        let proto = self.parse_prototype(false)?;
        let body = self.parse_block()?;
        Ok(FunctionDecl {
            proto,
            body,
            span: proto.span.merge(body.span),
        })
    }

    /// `fn [name](params) [Ret]`
    ///
    /// The name is required unless `anonymous` is set. A return type is
    /// parsed unless the signature is followed by `{`, `;`, `,` or `)`.
    pub(super) fn parse_prototype(&mut self, anonymous: bool) -> Result<Prototype<'ast>, ParseError> {
        let fn_token = self.expect_keyword("fn")?;
        let name = if anonymous {
            None
        } else {
            Some(self.expect_identifier()?)
        };

        self.expect_symbol("(")?;
        let mut params = BVec::new_in(self.arena);
        while !self.check_symbol(")") {
            if !params.is_empty() {
                self.expect_symbol(",")?;
            }
            params.push(self.parse_param()?);
        }
        self.expect_symbol(")")?;

        let ends_signature = ["{", ";", ",", ")"]
            .iter()
            .any(|sym| self.check_symbol(sym));
        let return_type = if ends_signature || self.is_eof() {
            None
        } else {
            Some(self.parse_type()?)
        };

        Ok(Prototype {
            name,
            params: params.into_bump_slice(),
            return_type,
            span: self.span_from(fn_token.span),
        })
    }

    /// `[mut] [~]name Type`
    fn parse_param(&mut self) -> Result<Param<'ast>, ParseError> {
        let start = self.peek().span;
        let mutable = self.eat_keyword("mut").is_some();
        let owned = self.eat_symbol("~").is_none();
        let name = self.expect_identifier()?;
        let ty = self.parse_type()?;
        Ok(Param {
            name,
            ty,
            mutable,
            owned,
            span: self.span_from(start),
        })
    }

    /// `type Name = T` without the trailing `;`.
    pub(super) fn parse_type_alias(&mut self) -> Result<TypeAliasDecl<'ast>, ParseError> {
        let keyword = self.expect_keyword("type")?;
        let name = self.expect_identifier()?;
        self.expect_symbol("=")?;
        let ty = self.parse_type()?;
        Ok(TypeAliasDecl {
            name,
            ty,
            span: self.span_from(keyword.span),
        })
    }

    /// `impl Name { fn ... }`
    fn parse_impl(&mut self) -> Result<ImplDecl<'ast>, ParseError> {
        let keyword = self.expect_keyword("impl")?;
        let name = self.expect_identifier()?;
        self.expect_symbol("{")?;

        let mut methods = BVec::new_in(self.arena);
        while !self.check_symbol("}") && !self.is_eof() {
            let start = self.position;
            if !self.check_keyword("fn") {
                let err = self.expected("method");
                self.errors.push(err);
                self.synchronize(start);
                continue;
            }
            match self.parse_function() {
                Ok(method) => methods.push(method),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize(start);
                }
            }
        }
        self.expect_symbol("}")?;

        Ok(ImplDecl {
            name,
            methods: methods.into_bump_slice(),
            span: self.span_from(keyword.span),
        })
    }

    /// `trait Name { fn sig; ... }`
    fn parse_trait(&mut self) -> Result<TraitDecl<'ast>, ParseError> {
        let keyword = self.expect_keyword("trait")?;
        let name = self.expect_identifier()?;
        self.expect_symbol("{")?;

        let mut methods = BVec::new_in(self.arena);
        while !self.check_symbol("}") && !self.is_eof() {
            methods.push(self.parse_prototype(false)?);
            self.expect_semicolon();
        }
        self.expect_symbol("}")?;

        Ok(TraitDecl {
            name,
            methods: methods.into_bump_slice(),
            span: self.span_from(keyword.span),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Script;
    use crate::lexer::tokenize;
    use bumpalo::Bump;
    use krug_core::ParseErrors;
    use test_log::test;

    fn parse<'ast>(source: &str, arena: &'ast Bump) -> (Script<'ast>, ParseErrors) {
        let (tokens, _) = tokenize(source);
        let mut parser = Parser::new(&tokens, arena);
        let script = parser.parse_script();
        (script, parser.take_errors())
    }

    #[test]
    fn function_with_params() {
        let arena = Bump::new();
        let (script, errors) = parse("fn add(a int, mut ~b *int) int { return a; }", &arena);
        assert!(errors.is_empty(), "{errors}");
        let Item::Function(func) = script.items[0] else {
            panic!("expected function");
        };
        assert_eq!(func.name().map(|n| n.name), Some("add"));
        assert_eq!(func.proto.params.len(), 2);
        assert!(!func.proto.params[0].mutable);
        assert!(func.proto.params[1].mutable);
        assert!(!func.proto.params[1].owned);
        assert!(matches!(func.proto.return_type, Some(TypeExpr::Named(n)) if n.name == "int"));
    }

    #[test]
    fn function_without_return_type() {
        let arena = Bump::new();
        let (script, errors) = parse("fn main() { }", &arena);
        assert!(errors.is_empty(), "{errors}");
        let Item::Function(func) = script.items[0] else {
            panic!("expected function");
        };
        assert!(func.proto.return_type.is_none());
    }

    #[test]
    fn structure_and_alias() {
        let arena = Bump::new();
        let (script, errors) = parse(
            "type Point = struct { x int, y int, }; type Id = int;",
            &arena,
        );
        assert!(errors.is_empty(), "{errors}");
        assert!(matches!(script.items[0], Item::Structure(s) if s.name.name == "Point" && s.body.fields.len() == 2));
        assert!(matches!(script.items[1], Item::TypeAlias(a) if a.name.name == "Id"));
    }

    #[test]
    fn impl_block() {
        let arena = Bump::new();
        let (script, errors) = parse("impl Point { fn len() int { } fn zero() { } }", &arena);
        assert!(errors.is_empty(), "{errors}");
        let Item::Impl(block) = script.items[0] else {
            panic!("expected impl");
        };
        assert_eq!(block.methods.len(), 2);
        assert_eq!(block.methods[1].name().map(|n| n.name), Some("zero"));
    }

    #[test]
    fn trait_signatures() {
        let arena = Bump::new();
        let (script, errors) = parse("trait Shape { fn area() int; fn name() *char; }", &arena);
        assert!(errors.is_empty(), "{errors}");
        let Item::Trait(tr) = script.items[0] else {
            panic!("expected trait");
        };
        assert_eq!(tr.methods.len(), 2);
    }

    #[test]
    fn globals() {
        let arena = Bump::new();
        let (script, errors) = parse("let limit int = 10; mut count int;", &arena);
        assert!(errors.is_empty(), "{errors}");
        assert!(matches!(script.items[0], Item::Global(g) if !g.mutable));
        assert!(matches!(script.items[1], Item::Global(g) if g.mutable));
    }

    #[test]
    fn directives_are_skipped() {
        let arena = Bump::new();
        let (script, errors) = parse("#{ include { std } } fn main() { }", &arena);
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(script.items.len(), 1);
    }

    #[test]
    fn top_level_expression_is_misplaced() {
        let arena = Bump::new();
        let (script, errors) = parse("f(1); fn main() { }", &arena);
        assert_eq!(script.items.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.iter().next().unwrap().kind,
            ParseErrorKind::MisplacedStatement
        );
    }

    #[test]
    fn recovers_at_next_item() {
        let arena = Bump::new();
        let (script, errors) = parse("fn (x) { } fn ok() { }", &arena);
        assert!(!errors.is_empty());
        assert!(script
            .items
            .iter()
            .any(|i| matches!(i, Item::Function(f) if f.name().map(|n| n.name) == Some("ok"))));
    }
}
