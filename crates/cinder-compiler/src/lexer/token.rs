use cinder_common::Span;
use serde::Serialize;
use std::fmt;

/// A single token produced by the scanner.
///
/// Fields are private so a token cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    line: u32,
    span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            span,
        }
    }

    /// The end-of-input sentinel: kind `Eof`, empty lexeme.
    pub fn eof(line: u32, span: Span) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line,
            span,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Exact source text of the token.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// 1-based line of the token's first character.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.lexeme)
    }
}

/// All token kinds in the Cinder language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // === Delimiters ===
    LeftParen,  // (
    RightParen, // )
    LeftBrace,  // {
    RightBrace, // }
    Comma,      // ,
    Dot,        // .
    Semicolon,  // ;

    // === Operators ===
    Minus,        // -
    Plus,         // +
    Star,         // *
    Slash,        // /
    Bang,         // !
    BangEqual,    // !=
    Equal,        // =
    EqualEqual,   // ==
    Greater,      // >
    GreaterEqual, // >=
    Less,         // <
    LessEqual,    // <=

    // === Special ===
    Eof,
}

impl TokenKind {
    /// Kind of a character that always forms a token on its own.
    pub fn punctuation(c: char) -> Option<TokenKind> {
        match c {
            '(' => Some(TokenKind::LeftParen),
            ')' => Some(TokenKind::RightParen),
            '{' => Some(TokenKind::LeftBrace),
            '}' => Some(TokenKind::RightBrace),
            ',' => Some(TokenKind::Comma),
            '.' => Some(TokenKind::Dot),
            '-' => Some(TokenKind::Minus),
            '+' => Some(TokenKind::Plus),
            ';' => Some(TokenKind::Semicolon),
            '*' => Some(TokenKind::Star),
            _ => None,
        }
    }

    /// `(simple, compound)` kinds for a character that may be followed by `=`.
    pub fn comparison(c: char) -> Option<(TokenKind, TokenKind)> {
        match c {
            '!' => Some((TokenKind::Bang, TokenKind::BangEqual)),
            '=' => Some((TokenKind::Equal, TokenKind::EqualEqual)),
            '>' => Some((TokenKind::Greater, TokenKind::GreaterEqual)),
            '<' => Some((TokenKind::Less, TokenKind::LessEqual)),
            _ => None,
        }
    }

    /// The fixed source spelling of this kind.
    pub fn symbol(self) -> &'static str {
        match self {
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Minus => "-",
            TokenKind::Plus => "+",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Eof => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_maps_each_char_to_its_own_kind() {
        for c in "(){},.-+;*".chars() {
            let kind = TokenKind::punctuation(c).unwrap();
            assert_eq!(kind.symbol(), c.to_string());
        }
        assert_eq!(TokenKind::punctuation(';'), Some(TokenKind::Semicolon));
        assert_eq!(TokenKind::punctuation('/'), None);
        assert_eq!(TokenKind::punctuation('='), None);
    }

    #[test]
    fn comparison_pairs() {
        for c in "!=<>".chars() {
            let (simple, compound) = TokenKind::comparison(c).unwrap();
            assert_eq!(simple.symbol(), c.to_string());
            assert_eq!(compound.symbol(), format!("{}=", c));
        }
        assert_eq!(TokenKind::comparison('+'), None);
    }

    #[test]
    fn eof_sentinel() {
        let token = Token::eof(3, Span::dummy());
        assert!(token.is_eof());
        assert_eq!(token.lexeme(), "");
        assert_eq!(token.line(), 3);
        assert_eq!(token.to_string(), "Eof()");
    }

    #[test]
    fn serializes_kind_in_screaming_case() {
        let token = Token::new(TokenKind::BangEqual, "!=", 1, Span::dummy());
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["kind"], "BANG_EQUAL");
        assert_eq!(json["lexeme"], "!=");
        assert_eq!(json["line"], 1);
    }
}
