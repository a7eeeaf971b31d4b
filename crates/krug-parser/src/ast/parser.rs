//! Token buffer, lookahead, error recording and recovery.
//!
//! Grammar rules live next door in the `*_parser.rs` modules, each adding
//! its own `impl Parser` block.

use crate::ast::node::Ident;
use crate::ast::Script;
use crate::lexer::{Token, TokenKind};
use bumpalo::collections::Vec as BVec;
use bumpalo::Bump;
use krug_core::{ParseError, ParseErrorKind, ParseErrors, Span};
use tracing::{debug, trace};

/// Keywords that start a statement or declaration; recovery stops before them.
const SYNC_KEYWORDS: &[&str] = &[
    "fn", "let", "mut", "type", "trait", "impl", "return", "if", "while", "loop", "defer",
    "break", "next", "jump",
];

/// Recursive-descent parser producing an arena-allocated [`Script`].
///
/// AST nodes and lexemes both live in the `'ast` arena. The token slice only needs to live during the
/// call to [`Parser::new`]; every lexeme is copied into the arena.
pub struct Parser<'ast> {
    /// Buffered tokens, always terminated by an end-of-file token.
    pub(super) buffer: Vec<Token<'ast>>,
    /// Index of the next unread token.
    pub(super) position: usize,
    pub(super) errors: ParseErrors,
    pub(super) arena: &'ast Bump,
}

impl<'ast> Parser<'ast> {
    /// Create a parser over an already lexed token stream.
    ///
    /// [`TokenKind::Invalid`] tokens are dropped: the lexer has reported
    /// them already.
    pub fn new(tokens: &[Token<'_>], arena: &'ast Bump) -> Self {
        let mut buffer = Vec::with_capacity(tokens.len() + 1);
        for token in tokens {
            match token.kind {
                TokenKind::Invalid => continue,
                TokenKind::EndOfFile => break,
                kind => buffer.push(Token::new(kind, arena.alloc_str(token.lexeme), token.span)),
            }
        }

        let end = tokens.last().map_or(0, |t| t.span.end);
        buffer.push(Token::new(TokenKind::EndOfFile, "", Span::point(end)));

        Self {
            buffer,
            position: 0,
            errors: ParseErrors::new(),
            arena,
        }
    }

    /// Parse the whole token stream into a [`Script`].
    ///
    /// Never fails outright: every error is recorded and the parser
    /// recovers at the next item. Use [`Parser::take_errors`] afterwards.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_script(&mut self) -> Script<'ast> {
        let mut items = BVec::new_in(self.arena);
        let start_span = self.peek().span;

        while !self.is_eof() {
            let start = self.position;
            match self.parse_item() {
                Ok(Some(item)) => {
                    trace!(span = %item.span(), "parsed item");
                    items.push(item);
                }
                Ok(None) => {}
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize(start);
                }
            }
        }

        let span = start_span.merge(self.previous().span);
        debug!(items = items.len(), errors = self.errors.len(), "parsed script");

        Script {
            items: items.into_bump_slice(),
            span,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors recorded so far, leaving none behind.
    pub fn take_errors(&mut self) -> ParseErrors {
        std::mem::take(&mut self.errors)
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// The next unread token.
    #[inline]
    pub fn peek(&self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// Peek ahead n tokens without consuming. Past the end this is the
    /// end-of-file token.
    pub fn peek_nth(&self, n: usize) -> Token<'ast> {
        let last = self.buffer.len() - 1;
        self.buffer[(self.position + n).min(last)]
    }

    /// The most recently consumed token, or the first token at the start.
    pub fn previous(&self) -> Token<'ast> {
        self.buffer[self.position.saturating_sub(1)]
    }

    /// Consume and return the next token.
    ///
    /// Never moves past the end-of-file token.
    pub fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if !token.is_eof() {
            self.position += 1;
        }
        token
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// Check if the current token is the symbol `sym`.
    #[inline]
    pub fn check_symbol(&self, sym: &str) -> bool {
        self.peek().is_symbol(sym)
    }

    /// Check if the current token is the keyword `word`.
    #[inline]
    pub fn check_keyword(&self, word: &str) -> bool {
        self.peek().is_keyword(word)
    }

    /// Consume the symbol `sym` if it is next.
    pub fn eat_symbol(&mut self, sym: &str) -> Option<Token<'ast>> {
        if self.check_symbol(sym) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume the keyword `word` if it is next.
    pub fn eat_keyword(&mut self, word: &str) -> Option<Token<'ast>> {
        if self.check_keyword(word) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect the symbol `sym`, consuming it.
    pub fn expect_symbol(&mut self, sym: &str) -> Result<Token<'ast>, ParseError> {
        match self.eat_symbol(sym) {
            Some(token) => Ok(token),
            None => Err(self.expected(&format!("'{sym}'"))),
        }
    }

    /// Expect the keyword `word`, consuming it.
    pub fn expect_keyword(&mut self, word: &str) -> Result<Token<'ast>, ParseError> {
        match self.eat_keyword(word) {
            Some(token) => Ok(token),
            None => Err(self.expected(&format!("'{word}'"))),
        }
    }

    /// Expect a non-keyword identifier.
    pub fn expect_identifier(&mut self) -> Result<Ident<'ast>, ParseError> {
        let token = self.peek();
        if token.is_plain_identifier() {
            self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else {
            Err(ParseError::expected_identifier(token.span, &token.describe()))
        }
    }

    /// Expect a `;`. A missing one is recorded and parsing carries on as
    /// if it were present.
    pub fn expect_semicolon(&mut self) {
        if self.eat_symbol(";").is_none() {
            let span = self.previous().span;
            let found = self.peek().describe();
            self.error(
                ParseErrorKind::MissingSemicolon,
                Span::point(span.end),
                format!("expected ';', found {found}"),
            );
        }
    }

    /// Span from `start` through the most recently consumed token.
    #[inline]
    pub fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous().span)
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Record an error without unwinding.
    pub fn error(&mut self, kind: ParseErrorKind, span: Span, message: impl Into<String>) {
        self.errors.push(ParseError::new(kind, span, message));
    }

    /// An "expected X, found Y" error at the current token.
    pub fn expected(&self, what: &str) -> ParseError {
        let token = self.peek();
        let kind = if token.is_eof() {
            ParseErrorKind::UnexpectedEof
        } else {
            ParseErrorKind::ExpectedToken
        };
        ParseError::new(kind, token.span, format!("expected {what}, found {}", token.describe()))
    }

    /// Skip tokens until a safe point after an error.
    ///
    /// `from` is the position where the failed construct started. Stops
    /// after a `;`, or before a `}` or a statement keyword, as long as at
    /// least one token has been consumed since `from`.
    pub fn synchronize(&mut self, from: usize) {
        while !self.is_eof() {
            let moved = self.position > from;
            if moved && self.previous().is_symbol(";") {
                return;
            }

            let token = self.peek();
            let at_boundary = token.is_symbol("}")
                || (token.kind == TokenKind::Identifier && SYNC_KEYWORDS.contains(&token.lexeme));
            if moved && at_boundary {
                return;
            }
            self.advance();
        }
    }

    /// Allocate a value in the AST arena.
    #[inline]
    pub(super) fn alloc<T>(&self, value: T) -> &'ast T {
        self.arena.alloc(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use test_log::test;

    fn parser<'ast>(source: &str, arena: &'ast Bump) -> Parser<'ast> {
        let (tokens, _) = tokenize(source);
        Parser::new(&tokens, arena)
    }

    #[test]
    fn navigation() {
        let arena = Bump::new();
        let mut p = parser("let x;", &arena);
        assert!(p.check_keyword("let"));
        assert_eq!(p.peek_nth(1).lexeme, "x");
        p.advance();
        assert_eq!(p.previous().lexeme, "let");
        assert!(p.eat_symbol(";").is_none());
        assert!(p.expect_identifier().is_ok());
        assert!(p.eat_symbol(";").is_some());
        assert!(p.is_eof());
        // Advancing at EOF stays put.
        assert!(p.advance().is_eof());
        assert!(p.peek_nth(10).is_eof());
    }

    #[test]
    fn invalid_tokens_are_dropped() {
        let arena = Bump::new();
        let p = parser("a ^ b", &arena);
        // a, b, EOF
        assert_eq!(p.buffer.len(), 3);
    }

    #[test]
    fn expect_reports_found_token() {
        let arena = Bump::new();
        let mut p = parser("x", &arena);
        let err = p.expect_symbol("(").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedToken);
        assert_eq!(err.message, "expected '(', found 'x'");

        p.advance();
        let err = p.expect_symbol(")").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedEof);
    }

    #[test]
    fn keywords_are_not_identifiers() {
        let arena = Bump::new();
        let mut p = parser("return", &arena);
        let err = p.expect_identifier().unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedIdentifier);
    }

    #[test]
    fn missing_semicolon_is_recorded() {
        let arena = Bump::new();
        let mut p = parser("x y", &arena);
        p.advance();
        p.expect_semicolon();
        assert_eq!(p.errors.len(), 1);
        assert_eq!(
            p.errors.iter().next().unwrap().kind,
            ParseErrorKind::MissingSemicolon
        );
        assert_eq!(p.peek().lexeme, "y");
    }

    #[test]
    fn synchronize_on_semicolon() {
        let arena = Bump::new();
        let mut p = parser("a b c; d", &arena);
        p.synchronize(0);
        assert_eq!(p.peek().lexeme, "d");
    }

    #[test]
    fn synchronize_on_keyword() {
        let arena = Bump::new();
        let mut p = parser("a b return x;", &arena);
        p.synchronize(0);
        assert!(p.check_keyword("return"));
    }

    #[test]
    fn synchronize_stops_before_closing_brace() {
        let arena = Bump::new();
        let mut p = parser("f( }", &arena);
        p.advance();
        p.advance();
        p.synchronize(0);
        assert!(p.check_symbol("}"));
    }

    #[test]
    fn synchronize_advances_at_least_once() {
        let arena = Bump::new();
        let mut p = parser("} fn", &arena);
        p.synchronize(0);
        assert!(p.check_keyword("fn"));
    }

    #[test]
    fn synchronize_at_eof() {
        let arena = Bump::new();
        let mut p = parser("", &arena);
        p.synchronize(0);
        assert!(p.is_eof());
    }
}
