//! Token types and definitions for the Krug lexer.

use krug_core::Span;
use std::fmt;

/// Reserved words. The lexer emits them as [`TokenKind::Identifier`];
/// the parser tells them apart by lexeme.
pub const KEYWORDS: &[&str] = &[
    "fn", "let", "type", "mut", "break", "return", "next", "trait", "struct", "impl", "comptime",
    "loop", "defer", "while", "if", "else", "jump",
];

/// Check if a name is a reserved word.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// A token from the source code.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// The type of token.
    pub kind: TokenKind,
    /// The exact source text of this token, quotes included.
    pub lexeme: &'src str,
    /// Location in source.
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'src str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// Whether this is the symbol `sym`.
    #[inline]
    pub fn is_symbol(&self, sym: &str) -> bool {
        self.kind == TokenKind::Symbol && self.lexeme == sym
    }

    /// Whether this is the keyword `word`.
    #[inline]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme == word
    }

    /// Whether this is an identifier that is not a reserved word.
    #[inline]
    pub fn is_plain_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier && !is_keyword(self.lexeme)
    }

    /// Whether this token is the end-of-file marker.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFile
    }

    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfFile => "end of file".to_string(),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All possible token classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifier or keyword: `main`, `let`, `_tmp`
    Identifier,
    /// Number literal: `42`, `3.14`
    Number,
    /// String literal: `"hello"`
    String,
    /// Character literal: `'a'`
    Char,
    /// Operator or punctuation: `+`, `==`, `;`
    Symbol,
    /// Input the lexer could not classify. Always paired with a lexer error.
    Invalid,
    /// End of input
    EndOfFile,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Char => "character",
            TokenKind::Symbol => "symbol",
            TokenKind::Invalid => "invalid token",
            TokenKind::EndOfFile => "end of file",
        };
        f.write_str(name)
    }
}
