//! Scanning Krug source into [`Token`]s.
//!
//! Each token is classified by its first character alone.

use krug_core::{LexError, Span};
use tracing::trace;

use super::cursor::{is_ident_continue, is_ident_start, is_symbol, is_whitespace, Cursor};
use super::token::{Token, TokenKind};

/// Pull-based scanner over one unit.
///
/// Never fails: characters it cannot classify become
/// [`TokenKind::Invalid`] tokens and a [`LexError`] is recorded for each.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// A source too long for `u32` offsets is reported once and then
    /// scanned as empty.
    pub fn new(source: &'src str) -> Self {
        let (cursor, errors) = match Cursor::new(source) {
            Ok(cursor) => (cursor, Vec::new()),
            Err(error) => (Cursor::empty(), vec![error]),
        };
        Self { cursor, errors }
    }

    /// Errors reported so far. Later calls only see newer ones.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Scan one token.
    ///
    /// Yields an [`TokenKind::EndOfFile`] token once input is exhausted,
    /// and keeps returning it on further calls.
    pub fn next_token(&mut self) -> Token<'src> {
        self.cursor.eat_while(is_whitespace);

        let start = self.cursor.offset();
        let Some(first) = self.cursor.peek() else {
            return Token::new(TokenKind::EndOfFile, "", Span::point(start));
        };

        match first {
            c if c.is_ascii_digit() => self.scan_number(start),
            c if is_ident_start(c) => self.scan_identifier(start),
            '"' => self.scan_string(start),
            '\'' => self.scan_char(start),
            c if is_symbol(c) => self.scan_symbol(start),
            c => {
                self.cursor.advance();
                self.make_error(
                    LexError::UnexpectedChar {
                        ch: c,
                        span: Span::new(start, self.cursor.offset()),
                    },
                    start,
                )
            }
        }
    }

    // =========================================
    // Internal: Token construction
    // =========================================

    /// Create a token from start offset to current position.
    fn make_token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let end = self.cursor.offset();
        Token::new(kind, self.cursor.slice_from(start), Span::new(start, end))
    }

    /// Create an invalid token and record the error.
    fn make_error(&mut self, error: LexError, start: u32) -> Token<'src> {
        trace!(%error, "lexer error");
        self.errors.push(error);
        self.make_token(TokenKind::Invalid, start)
    }

    // =========================================
    // Scanning: Literals
    // =========================================

    /// Digit run with at most one `.` fraction.
    ///
    /// `1.2.3` is not rejected here: it scans as `1.2`, `.`, `3` and the
    /// parser reports whatever that turns into.
    fn scan_number(&mut self, start: u32) -> Token<'src> {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.') && self.cursor.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        self.make_token(TokenKind::Number, start)
    }

    /// String literal with no escape processing.
    fn scan_string(&mut self, start: u32) -> Token<'src> {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.advance() {
                Some('"') => return self.make_token(TokenKind::String, start),
                Some(_) => {}
                None => {
                    let span = Span::new(start, self.cursor.offset());
                    return self.make_error(LexError::UnterminatedString { span }, start);
                }
            }
        }
    }

    /// Single-character literal: `'x'`.
    fn scan_char(&mut self, start: u32) -> Token<'src> {
        self.cursor.advance(); // opening quote
        let filled = self.cursor.check(|c| c != '\'' && c != '\n');
        if filled {
            self.cursor.advance();
        }
        let closed = self.cursor.eat('\'');
        let span = Span::new(start, self.cursor.offset());
        match (filled, closed) {
            (true, true) => self.make_token(TokenKind::Char, start),
            (false, true) => self.make_error(LexError::EmptyChar { span }, start),
            (_, false) => self.make_error(LexError::UnterminatedChar { span }, start),
        }
    }

    // =========================================
    // Scanning: Identifiers and symbols
    // =========================================

    fn scan_identifier(&mut self, start: u32) -> Token<'src> {
        self.cursor.eat_while(is_ident_continue);
        self.make_token(TokenKind::Identifier, start)
    }

    fn scan_symbol(&mut self, start: u32) -> Token<'src> {
        let first = self.cursor.advance();
        let is_double = matches!(
            (first, self.cursor.peek()),
            (Some('='), Some('='))
                | (Some('!'), Some('='))
                | (Some('&'), Some('&'))
                | (Some('|'), Some('|'))
                | (Some('<'), Some('='))
                | (Some('>'), Some('='))
        );
        if is_double {
            self.cursor.advance();
        }
        self.make_token(TokenKind::Symbol, start)
    }
}

/// Yields tokens up to, but not including, end of file.
impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_token()).filter(|token| !token.is_eof())
    }
}

/// Tokenize a whole unit.
///
/// The returned sequence does not include the end-of-file token.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn tokenize(source: &str) -> (Vec<Token<'_>>, Vec<LexError>) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.by_ref().collect::<Vec<_>>();
    let errors = lexer.take_errors();
    tracing::debug!(tokens = tokens.len(), errors = errors.len(), "tokenized unit");
    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn lex(source: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new(source).map(|t| (t.kind, t.lexeme)).collect()
    }

    fn token_kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|token| token.kind).collect()
    }

    // =========================================
    // Basic tokens
    // =========================================

    #[test]
    fn empty_source() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfFile);
        assert_eq!(lexer.next_token().kind, TokenKind::EndOfFile);
    }

    #[test]
    fn whitespace_only() {
        assert!(lex("  \t\r\n ").is_empty());
    }

    #[test]
    fn let_statement_sequence() {
        assert_eq!(
            lex("let x = 1 + 2;"),
            vec![
                (TokenKind::Identifier, "let"),
                (TokenKind::Identifier, "x"),
                (TokenKind::Symbol, "="),
                (TokenKind::Number, "1"),
                (TokenKind::Symbol, "+"),
                (TokenKind::Number, "2"),
                (TokenKind::Symbol, ";"),
            ]
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let tokens: Vec<_> = Lexer::new("let  xy").collect();
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(5, 7));
    }

    // =========================================
    // Identifiers
    // =========================================

    #[test]
    fn identifiers() {
        assert_eq!(
            lex("foo _bar baz42 ñame"),
            vec![
                (TokenKind::Identifier, "foo"),
                (TokenKind::Identifier, "_bar"),
                (TokenKind::Identifier, "baz42"),
                (TokenKind::Identifier, "ñame"),
            ]
        );
    }

    #[test]
    fn digits_start_numbers_not_identifiers() {
        assert_eq!(
            lex("9lives"),
            vec![(TokenKind::Number, "9"), (TokenKind::Identifier, "lives")]
        );
    }

    // =========================================
    // Numbers
    // =========================================

    #[test]
    fn integer_and_float_literals() {
        assert_eq!(
            lex("0 42 3.14"),
            vec![
                (TokenKind::Number, "0"),
                (TokenKind::Number, "42"),
                (TokenKind::Number, "3.14"),
            ]
        );
    }

    #[test]
    fn number_with_two_dots() {
        assert_eq!(
            lex("1.2.3"),
            vec![
                (TokenKind::Number, "1.2"),
                (TokenKind::Symbol, "."),
                (TokenKind::Number, "3"),
            ]
        );
    }

    #[test]
    fn trailing_dot_is_a_path_separator() {
        assert_eq!(
            lex("a.0"),
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Symbol, "."),
                (TokenKind::Number, "0"),
            ]
        );
        assert_eq!(token_kinds("1."), vec![TokenKind::Number, TokenKind::Symbol]);
    }

    // =========================================
    // Strings and chars
    // =========================================

    #[test]
    fn string_literals_keep_quotes() {
        assert_eq!(lex(r#""hello world""#), vec![(TokenKind::String, "\"hello world\"")]);
    }

    #[test]
    fn strings_have_no_escapes() {
        assert_eq!(
            lex(r#""a\" b"#),
            vec![(TokenKind::String, r#""a\""#), (TokenKind::Identifier, "b")]
        );
    }

    #[test]
    fn unterminated_string() {
        let mut lexer = Lexer::new(r#"let s = "hello"#);
        let tokens: Vec<_> = lexer.by_ref().collect();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Invalid));
        assert_eq!(tokens.last().map(|t| t.lexeme), Some("\"hello"));
        let errors = lexer.take_errors();
        assert_eq!(errors, vec![LexError::UnterminatedString { span: Span::new(8, 14) }]);
    }

    #[test]
    fn char_literals() {
        assert_eq!(lex("'a' 'z'"), vec![(TokenKind::Char, "'a'"), (TokenKind::Char, "'z'")]);
    }

    #[test]
    fn empty_char_is_an_error() {
        let mut lexer = Lexer::new("'' x");
        let first = lexer.next_token();
        assert_eq!((first.kind, first.lexeme), (TokenKind::Invalid, "''"));
        assert_eq!(lexer.next_token().lexeme, "x");
        assert_eq!(lexer.take_errors(), vec![LexError::EmptyChar { span: Span::new(0, 2) }]);
    }

    #[test]
    fn unterminated_char() {
        let mut lexer = Lexer::new("'ab");
        assert_eq!(lexer.next_token().kind, TokenKind::Invalid);
        assert_eq!(lexer.next_token().lexeme, "b");
        assert!(matches!(lexer.take_errors()[..], [LexError::UnterminatedChar { .. }]));
    }

    // =========================================
    // Symbols
    // =========================================

    #[test]
    fn double_symbols() {
        assert_eq!(
            lex("== != && || <= >="),
            vec![
                (TokenKind::Symbol, "=="),
                (TokenKind::Symbol, "!="),
                (TokenKind::Symbol, "&&"),
                (TokenKind::Symbol, "||"),
                (TokenKind::Symbol, "<="),
                (TokenKind::Symbol, ">="),
            ]
        );
    }

    #[test]
    fn compound_assignment_is_two_symbols() {
        assert_eq!(
            lex("+="),
            vec![(TokenKind::Symbol, "+"), (TokenKind::Symbol, "=")]
        );
    }

    #[test]
    fn single_symbols() {
        let source = "+ - / * % = ( ) { } [ ] < > . $ ! ? # , | & ~ @ ; :";
        let tokens = lex(source);
        assert_eq!(tokens.len(), 26);
        assert!(tokens.iter().all(|(kind, _)| *kind == TokenKind::Symbol));
    }

    #[test]
    fn underscore_starts_identifier() {
        assert_eq!(lex("_"), vec![(TokenKind::Identifier, "_")]);
    }

    // =========================================
    // Errors
    // =========================================

    #[test]
    fn invalid_character_is_not_end_of_input() {
        let mut lexer = Lexer::new("a ^ b");
        let tokens: Vec<_> = lexer.by_ref().map(|t| (t.kind, t.lexeme)).collect();
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Identifier, "a"),
                (TokenKind::Invalid, "^"),
                (TokenKind::Identifier, "b"),
            ]
        );
        assert_eq!(
            lexer.take_errors(),
            vec![LexError::UnexpectedChar { ch: '^', span: Span::new(2, 3) }]
        );
    }

    #[test]
    fn tokenize_collects_errors() {
        let (tokens, errors) = tokenize("fn main() { @x; }");
        assert_eq!(tokens.len(), 9);
        assert!(errors.is_empty());

        let (tokens, errors) = tokenize("x = \"oops");
        assert_eq!(tokens.len(), 3);
        assert_eq!(errors.len(), 1);
    }
}
