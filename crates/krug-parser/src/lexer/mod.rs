//! Lexical analysis for Krug source.

mod cursor;
mod lexer;
mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{is_keyword, Token, TokenKind, KEYWORDS};
