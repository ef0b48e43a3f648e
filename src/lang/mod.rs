/*!
# Rust Language Module

This Rust module provides the line-level front end of the Aegis script
language: source loading, the line scanner, nested call splitting and the
symbol table.

*/

pub type LineNumber = Option<usize>;
pub type Column = std::ops::Range<usize>;

#[macro_use]
mod error;
mod lex;
mod line;
mod parse;
mod symbol;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use line::Line;
pub use parse::parse;
pub use symbol::{Constant, Symbol, SymbolTable};
pub use token::Word;

#[cfg(test)]
mod tests;
