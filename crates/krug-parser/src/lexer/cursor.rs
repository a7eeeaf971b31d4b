//! Character-level reading of a unit's source.
//!
//! Offsets are byte offsets into the original text, so every slice handed
//! out borrows from the source rather than copying. They are `u32`, which
//! caps a unit at `u32::MAX` bytes; [`Cursor::new`] rejects anything longer.

use krug_core::LexError;

/// Every character the lexer accepts as a one-character symbol.
const SYMBOLS: &str = "+-/*%=(){}[]<>.$!?#,|&_~@;:";

/// Read position in a source text. Looks at most two characters ahead.
pub struct Cursor<'src> {
    source: &'src str,
    offset: u32,
    /// `source.len()`, known to fit.
    end: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Result<Self, LexError> {
        let end = offset_limit(source.len())?;
        Ok(Self { source, offset: 0, end })
    }

    /// A cursor already at end of input.
    pub fn empty() -> Self {
        Self {
            source: "",
            offset: 0,
            end: 0,
        }
    }

    /// Byte offset of the next unread character.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    fn rest(&self) -> &'src str {
        &self.source[self.offset as usize..]
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.end
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// One past [`peek`](Self::peek).
    #[inline]
    pub fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    #[inline]
    pub fn check(&self, pred: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(pred)
    }

    /// Step over one character. `None` once the input is exhausted.
    pub fn advance(&mut self) -> Option<char> {
        let next = self.peek()?;
        self.offset += next.len_utf8() as u32;
        Some(next)
    }

    /// Step over `expected` if it is next.
    #[inline]
    pub fn eat(&mut self, expected: char) -> bool {
        let hit = self.peek() == Some(expected);
        if hit {
            self.advance();
        }
        hit
    }

    /// Step over the longest run matching `pred` and return it.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset;
        while self.check(&pred) {
            self.advance();
        }
        self.slice_from(start)
    }

    /// Jump to the end of input, returning everything skipped.
    pub fn eat_rest(&mut self) -> &'src str {
        let start = self.offset;
        self.offset = self.end;
        self.slice_from(start)
    }

    /// Text between `start` and the current position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.offset as usize]
    }
}

fn offset_limit(len: usize) -> Result<u32, LexError> {
    u32::try_from(len).map_err(|_| LexError::SourceTooLarge { len })
}

/// Layout characters: everything at or below the space character.
#[inline]
pub fn is_whitespace(ch: char) -> bool {
    ch <= ' '
}

#[inline]
pub fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

#[inline]
pub fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[inline]
pub fn is_symbol(ch: char) -> bool {
    SYMBOLS.contains(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peeks_do_not_move() {
        let mut cursor = Cursor::new("fn").unwrap();
        assert_eq!(cursor.peek(), Some('f'));
        assert_eq!(cursor.peek_second(), Some('n'));
        assert_eq!(cursor.offset(), 0);

        assert_eq!(cursor.advance(), Some('f'));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.peek_second(), None);
        assert!(!cursor.is_eof());
    }

    #[test]
    fn eat_and_eat_while() {
        let mut cursor = Cursor::new("xyz789").unwrap();
        assert!(cursor.eat('x'));
        assert!(!cursor.eat('q'));
        assert_eq!(cursor.eat_while(char::is_alphabetic), "yz");
        assert_eq!(cursor.eat_while(|c| c.is_ascii_digit()), "789");
        assert!(cursor.is_eof());
        assert_eq!(cursor.advance(), None);
    }

    #[test]
    fn eat_rest_reaches_the_end() {
        let mut cursor = Cursor::new("\"open string").unwrap();
        cursor.advance();
        assert_eq!(cursor.eat_rest(), "open string");
        assert!(cursor.is_eof());
        assert_eq!(cursor.offset(), 12);
    }

    #[test]
    fn offsets_count_bytes() {
        let mut cursor = Cursor::new("aλb").unwrap();
        cursor.advance();
        assert_eq!(cursor.advance(), Some('λ'));
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.slice_from(0), "aλ");
    }

    #[test]
    fn empty_cursor_is_at_end() {
        let mut cursor = Cursor::empty();
        assert!(cursor.is_eof());
        assert_eq!(cursor.eat_rest(), "");
    }

    #[test]
    fn offsets_must_fit_in_u32() {
        assert_eq!(offset_limit(12), Ok(12));
        assert_eq!(offset_limit(u32::MAX as usize), Ok(u32::MAX));

        #[cfg(target_pointer_width = "64")]
        {
            let len = u32::MAX as usize + 1;
            assert_eq!(offset_limit(len), Err(LexError::SourceTooLarge { len }));
        }
    }

    #[test]
    fn character_classes() {
        assert!(is_whitespace(' '));
        assert!(is_whitespace('\n'));
        assert!(is_whitespace('\0'));
        assert!(!is_whitespace('a'));

        assert!(is_ident_start('_'));
        assert!(is_ident_start('λ'));
        assert!(!is_ident_start('1'));
        assert!(is_ident_continue('1'));

        assert!(is_symbol('$'));
        assert!(is_symbol(':'));
        assert!(is_symbol('@'));
        assert!(!is_symbol('^'));
        assert!(!is_symbol('"'));
    }
}
