pub mod cursor;
pub mod error;
pub mod token;

mod scanner;

pub use error::{ErrorReporter, LexError};
pub use scanner::{scan, ScanOutput, Scanner};
pub use token::{Token, TokenKind};
