use cinder_common::{DiagnosticBag, Position};
use tracing::{debug, trace};

use super::cursor::Cursor;
use super::error::{ErrorReporter, LexError};
use super::token::{Token, TokenKind};

/// Hand-written scanner for the Cinder language.
///
/// Recognizes punctuation, one- and two-character operators and line
/// comments. Whitespace, newlines and comments consume input without
/// producing tokens. A scanner is used for exactly one pass: every scanning
/// method takes `self` by value.
pub struct Scanner<'src> {
    cursor: Cursor<'src>,
    /// Start of the token currently being recognized.
    start: Position,
    tokens: Vec<Token>,
}

/// Tokens of one scan together with every error reported during it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl ScanOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Token>, Vec<LexError>) {
        (self.tokens, self.errors)
    }
}

/// Keeps a copy of every reported error.
#[derive(Default)]
struct ErrorLog(Vec<LexError>);

impl ErrorReporter for ErrorLog {
    fn report(&mut self, error: &LexError) {
        self.0.push(error.clone());
    }
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str, file: impl Into<String>) -> Self {
        Self {
            cursor: Cursor::new(source, file),
            start: Position::start(),
            tokens: Vec::new(),
        }
    }

    /// Scan the whole source, handing each lexical error to `reporter`.
    ///
    /// The returned sequence always ends with exactly one `Eof` token.
    pub fn scan_tokens<R>(mut self, reporter: &mut R) -> Vec<Token>
    where
        R: ErrorReporter + ?Sized,
    {
        debug!("scan started");
        while !self.cursor.is_at_end() {
            self.start = self.cursor.position();
            self.scan_token(reporter);
        }

        let end = self.cursor.position();
        let line = self.cursor.line();
        self.tokens.push(Token::eof(line, self.cursor.span_from(end)));
        debug!(tokens = self.tokens.len(), lines = line, "scan finished");
        self.tokens
    }

    /// Scan the whole source, collecting errors alongside the tokens.
    pub fn scan(self) -> ScanOutput {
        let mut log = ErrorLog::default();
        let tokens = self.scan_tokens(&mut log);
        ScanOutput {
            tokens,
            errors: log.0,
        }
    }

    /// Tokenize the entire source, returning all tokens and diagnostics.
    pub fn tokenize(self) -> (Vec<Token>, DiagnosticBag) {
        let (tokens, errors) = self.scan().into_parts();
        let mut diagnostics = DiagnosticBag::new();
        diagnostics.extend(errors.iter().map(LexError::to_diagnostic));
        (tokens, diagnostics)
    }

    /// Consume one character and emit at most one token for it.
    fn scan_token<R>(&mut self, reporter: &mut R)
    where
        R: ErrorReporter + ?Sized,
    {
        let Some(ch) = self.cursor.advance() else {
            return;
        };

        if let Some(kind) = TokenKind::punctuation(ch) {
            self.add_token(kind);
            return;
        }
        if let Some((simple, compound)) = TokenKind::comparison(ch) {
            let kind = if self.cursor.eat('=') { compound } else { simple };
            self.add_token(kind);
            return;
        }

        match ch {
            '/' => {
                if self.cursor.eat('/') {
                    // Line comment: runs up to, not including, the newline.
                    self.cursor.eat_while(|c| c != '\n');
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            // The cursor already counted the line.
            '\n' => {}
            _ => {
                let error = LexError::UnexpectedCharacter {
                    ch,
                    span: self.cursor.span_from(self.start),
                };
                debug!(line = error.line(), %error, "lexical error");
                reporter.report(&error);
            }
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.cursor.slice_from(self.start);
        let span = self.cursor.span_from(self.start);
        trace!(?kind, lexeme, line = self.start.line, "token");
        self.tokens.push(Token::new(kind, lexeme, self.start.line, span));
    }
}

/// Scan `source` with no file name attached.
pub fn scan(source: &str) -> ScanOutput {
    Scanner::new(source, "").scan()
}
