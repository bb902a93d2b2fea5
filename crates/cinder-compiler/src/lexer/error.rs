use cinder_common::{Diagnostic, Span};
use thiserror::Error;

/// Errors found while scanning. Scanning never stops on one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character")]
    UnexpectedCharacter { ch: char, span: Span },
}

impl LexError {
    /// 1-based line where the error occurred.
    pub fn line(&self) -> u32 {
        self.span().start.line
    }

    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedCharacter { span, .. } => span,
        }
    }

    /// Diagnostic naming the offending character.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LexError::UnexpectedCharacter { ch, span } => {
                let diag = Diagnostic::error(format!("{} '{}'", self, ch), span.clone());
                if ch.is_ascii() {
                    diag
                } else {
                    diag.with_suggestion("only ASCII punctuation and operators are recognized")
                }
            }
        }
    }
}

/// Sink the scanner hands every lexical error to, as it is found.
///
/// Any `FnMut(u32, &str)` closure is a reporter; it receives the line
/// number and the fixed message of the error kind.
pub trait ErrorReporter {
    fn report(&mut self, error: &LexError);
}

impl<F> ErrorReporter for F
where
    F: FnMut(u32, &str),
{
    fn report(&mut self, error: &LexError) {
        self(error.line(), &error.to_string());
    }
}
