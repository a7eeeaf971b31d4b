//! Krug parser crate.
//!
//! This crate provides the lexer and parser for Krug source code.
//! It includes:
//! - Lexical analysis (tokenization)
//! - Abstract Syntax Tree (AST) definitions
//! - Parser for transforming tokens into AST
//!
//! # Example
//!
//! ```
//! use krug_parser::Parser;
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let source = r#"
//!     fn main() int {
//!         mut total int = 0;
//!         while total < 10; total += 1 { }
//!         return total;
//!     }
//! "#;
//!
//! match Parser::parse(source, &arena) {
//!     Ok(script) => println!("Parsed successfully: {} items", script.items().len()),
//!     Err(errors) => eprintln!("Parse errors: {}", errors),
//! }
//! ```

// Lexer module
pub mod lexer;

// AST module
pub mod ast;

// Re-export commonly used types at crate root
pub use ast::{parse, Parser, Script};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
