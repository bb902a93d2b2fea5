use cinder_common::{Position, Span};

/// Low-level character reader over source text.
///
/// Tracks the next unconsumed position (line, column, byte offset) and
/// provides peek/advance primitives for the scanner. The cursor only moves
/// forward.
pub struct Cursor<'src> {
    source: &'src str,
    file: String,
    /// Byte offset of the *next* character to be consumed.
    offset: usize,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str, file: impl Into<String>) -> Self {
        Self {
            source,
            file: file.into(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current position in the source.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// True if there are no more characters.
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.source.len()
    }

    /// Peek at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.source.get(self.offset..)?.chars().next()
    }

    /// Consume and return the next character.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consume the next character if it matches `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume characters while `predicate` returns true.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if predicate(ch) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Slice the source from `start` to the current position.
    pub fn slice_from(&self, start: Position) -> &'src str {
        &self.source[start.offset..self.offset]
    }

    /// Build a Span from a start position to the current position.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(self.file.clone(), start, self.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut cursor = Cursor::new("a\nbc", "t.cin");
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.position().column, 2);
        assert_eq!(cursor.advance(), Some('\n'));
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.position().column, 1);
        assert_eq!(cursor.advance(), Some('b'));
        assert_eq!(cursor.advance(), Some('c'));
        assert!(cursor.is_at_end());
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn eat_only_consumes_on_match() {
        let mut cursor = Cursor::new("=>", "t.cin");
        assert!(!cursor.eat('>'));
        assert_eq!(cursor.position().offset, 0);
        assert!(cursor.eat('='));
        assert!(cursor.eat('>'));
        assert!(!cursor.eat('>'));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn eat_while_stops_before_rejected_char() {
        let mut cursor = Cursor::new("// note\n+", "t.cin");
        let start = cursor.position();
        cursor.eat_while(|c| c != '\n');
        assert_eq!(cursor.slice_from(start), "// note");
        assert_eq!(cursor.peek(), Some('\n'));
        assert_eq!(cursor.line(), 1);
    }

    #[test]
    fn multibyte_chars_advance_whole() {
        let mut cursor = Cursor::new("é+", "t.cin");
        let start = cursor.position();
        assert_eq!(cursor.advance(), Some('é'));
        assert_eq!(cursor.position().offset, 2);
        assert_eq!(cursor.slice_from(start), "é");
        let span = cursor.span_from(start);
        assert_eq!(span.len(), 2);
        assert_eq!(span.file, "t.cin");
    }
}
