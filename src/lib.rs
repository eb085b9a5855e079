// File: src/lib.rs
//
// Library interface for the Pithon interpreter.
// Exposes modules for integration testing and external use.

pub mod ast;
pub mod errors;
pub mod fixtures;
pub mod interpreter;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod repl;
pub mod stack;
