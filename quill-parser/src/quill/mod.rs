//! The quill format: token model, lexer, AST, parser and the tooling around them.

pub mod ast;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod testing;
pub mod token;
