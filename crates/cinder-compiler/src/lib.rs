//! Front end of the Cinder language.
//!
//! Only lexical analysis lives here for now: [`lexer::Scanner`] turns source
//! text into a flat token stream ending in a single `Eof` sentinel.

pub mod lexer;
