//! MCSS Parser
//!
//! Walks preprocessed MCSS text once and emits a flat sequence of
//! [`Chunk`]s — one per declaration statement, each carrying its resolved
//! selector ancestry and at-rule ancestry. The chunk sequence is the
//! informal AST every later compilation pass transforms.

pub mod ast;
pub mod parser;

pub use ast::{split_step_counter, Chunk};
pub use parser::Parser;

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}
