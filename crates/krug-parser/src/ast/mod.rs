//! Abstract Syntax Tree (AST) for Krug.
//!
//! This module provides:
//! - AST node definitions for all Krug constructs
//! - A recursive-descent parser with precedence climbing for binary
//!   operators
//!
//! # Example
//!
//! ```
//! use krug_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     type Point = struct { x int, y int, };
//!
//!     fn origin() Point {
//!         return :Point{0, 0};
//!     }
//! "#;
//!
//! match Parser::parse(source, &arena) {
//!     Ok(script) => println!("Parsed successfully: {} items", script.items().len()),
//!     Err(errors) => eprintln!("Parse errors: {}", errors),
//! }
//! ```

// Core types
pub mod node;
pub mod ops;

mod parser;
mod type_parser;
pub mod types;

pub mod expr;
mod expr_parser;

pub mod stmt;
mod stmt_parser;

pub mod decl;
mod decl_parser;

pub use decl::*;
pub use expr::*;
pub use node::*;
pub use ops::*;
pub use parser::Parser;
pub use stmt::*;
pub use types::*;

use crate::lexer::{tokenize, Token};
use bumpalo::Bump;
use krug_core::{LexError, ParseError, ParseErrorKind, ParseErrors, Span};

/// A parsed Krug script.
///
/// The script borrows from an arena allocator. All AST nodes are allocated
/// in the arena and remain valid for the lifetime of the arena.
#[derive(Debug, Clone, Copy)]
pub struct Script<'ast> {
    pub(crate) items: &'ast [Item<'ast>],
    pub(crate) span: Span,
}

impl<'ast> Script<'ast> {
    /// Get the top-level items in this script.
    pub fn items(&self) -> &'ast [Item<'ast>] {
        self.items
    }

    /// Get the source location span of this script.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// Parse a token stream into a script plus every error met on the way.
pub fn parse<'ast>(tokens: &[Token<'_>], arena: &'ast Bump) -> (Script<'ast>, ParseErrors) {
    let mut parser = Parser::new(tokens, arena);
    let script = parser.parse_script();
    (script, parser.take_errors())
}

impl<'ast> Parser<'ast> {
    /// Lex and parse `source`, failing if anything went wrong.
    ///
    /// Lexer errors are folded into the returned [`ParseErrors`].
    pub fn parse(source: &str, arena: &'ast Bump) -> Result<Script<'ast>, ParseErrors> {
        let (script, errors) = Self::parse_lenient(source, arena);
        if errors.is_empty() {
            Ok(script)
        } else {
            Err(errors)
        }
    }

    /// Lex and parse `source`, returning whatever could be recovered
    /// alongside every error.
    pub fn parse_lenient(source: &str, arena: &'ast Bump) -> (Script<'ast>, ParseErrors) {
        let (tokens, lex_errors) = tokenize(source);
        let mut errors = lexer_errors(lex_errors);
        let (script, parse_errors) = parse(&tokens, arena);
        errors.extend(parse_errors);
        (script, errors)
    }

    /// Parse a single expression. Trailing tokens are an error.
    pub fn expression(source: &str, arena: &'ast Bump) -> Result<Expr<'ast>, ParseErrors> {
        let (tokens, lex_errors) = tokenize(source);
        let mut errors = lexer_errors(lex_errors);
        let mut parser = Parser::new(&tokens, arena);

        let expr = match parser.parse_expr() {
            Ok(expr) => Some(expr),
            Err(err) => {
                errors.push(err);
                None
            }
        };
        if expr.is_some() && !parser.is_eof() {
            let token = parser.peek();
            errors.push(ParseError::unexpected_token(token.span, &token.describe()));
        }
        errors.extend(parser.take_errors());

        match expr {
            Some(expr) if errors.is_empty() => Ok(expr),
            _ => Err(errors),
        }
    }
}

fn lexer_errors(lex_errors: Vec<LexError>) -> ParseErrors {
    lex_errors
        .into_iter()
        .map(|err| ParseError::new(ParseErrorKind::InvalidSyntax, err.span(), format!("lexer error: {err}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn parse_simple_function() {
        let arena = Bump::new();
        let script = Parser::parse("fn foo() { }", &arena).unwrap();
        assert_eq!(script.items().len(), 1);
    }

    #[test]
    fn parse_structure_with_methods() {
        let arena = Bump::new();
        let source = r#"
            type Player = struct { health int, };
            impl Player {
                fn hit(mut self *Player, amount int) {
                    self.health -= amount;
                }
            }
        "#;
        let script = Parser::parse(source, &arena).unwrap();
        assert_eq!(script.items().len(), 2);
    }

    #[test]
    fn parse_with_errors() {
        let arena = Bump::new();
        let result = Parser::parse("let x = ;", &arena);
        assert!(!result.unwrap_err().is_empty());
    }

    #[test]
    fn lexer_errors_are_reported() {
        let arena = Bump::new();
        let errors = Parser::parse("fn main() { \"open", &arena).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::InvalidSyntax && e.message.starts_with("lexer error")));
    }

    #[test]
    fn parse_lenient_recovers() {
        let arena = Bump::new();
        let source = r#"
            let x = ;
            let y int = 42;
        "#;
        let (script, errors) = Parser::parse_lenient(source, &arena);
        assert!(!errors.is_empty());
        assert_eq!(script.items().len(), 1);
    }

    #[test]
    fn parse_lenient_no_errors() {
        let arena = Bump::new();
        let (script, errors) = Parser::parse_lenient("let x int = 42;", &arena);
        assert!(errors.is_empty());
        assert_eq!(script.items().len(), 1);
    }

    #[test]
    fn parse_expression_simple() {
        let arena = Bump::new();
        assert!(Parser::expression("1 + 2", &arena).is_ok());
    }

    #[test]
    fn parse_expression_complex() {
        let arena = Bump::new();
        assert!(Parser::expression("obj.method()[0].field", &arena).is_ok());
    }

    #[test]
    fn parse_expression_with_error() {
        let arena = Bump::new();
        assert!(Parser::expression("1 +", &arena).is_err());
        assert!(Parser::expression("1 2", &arena).is_err());
    }

    #[test]
    fn token_stream_entry_point() {
        let arena = Bump::new();
        let (tokens, _) = tokenize("fn a() { } fn b() { }");
        let (script, errors) = parse(&tokens, &arena);
        assert!(errors.is_empty());
        assert_eq!(script.items().len(), 2);
        assert_eq!(script.span(), Span::new(0, 21));
    }
}
